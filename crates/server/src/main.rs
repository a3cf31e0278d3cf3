use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weather_mcp::transport::{self, StdioTransport};

mod api;
mod config;

use config::{AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "weather-mcp")]
#[command(about = "MCP tool server with stdio and HTTP transports", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "weather-mcp.toml")]
    config: PathBuf,

    /// Port to listen on (HTTP mode)
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to (HTTP mode)
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Serve JSON over HTTP (default)
    Http,
    /// Serve newline-delimited JSON over stdin/stdout
    Stdio,
}

/// Logs go to stderr so stdout stays a clean protocol stream.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "weather_mcp=info,tower_http=info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = ServerConfig::load(&args.config)?;
    init_tracing(args.log_json || config.logging.json);

    if !args.config.exists() {
        tracing::info!("Configuration file not found, using defaults");
    }

    match args.mode.unwrap_or(Mode::Http) {
        Mode::Stdio => {
            tracing::info!("Starting in stdio mode");
            let server = config.build_server();
            let mut stdio = StdioTransport::new();
            transport::serve(&server, &mut stdio).await?;
        }
        Mode::Http => {
            tracing::info!("Starting in HTTP mode");
            let addr = format!("{}:{}", args.host, args.port);
            api::serve(&addr, AppState::new(&config)).await?;
        }
    }

    Ok(())
}
