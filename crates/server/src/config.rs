use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use weather_mcp::protocol::ServerInfo;
use weather_mcp::tools::ToolRegistry;
use weather_mcp::{HandshakeState, McpServer};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: IdentityConfig,

    #[serde(default)]
    pub mcp: McpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity advertised in handshake responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_server_name")]
    pub name: String,

    #[serde(default)]
    pub vendor: Option<String>,
}

fn default_server_name() -> String {
    "weather-mcp".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            vendor: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfig {
    /// Refuse tool calls until the session completes a handshake
    #[serde(default)]
    pub require_handshake: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read configuration file")?;
        toml::from_str(&content).context("Failed to parse configuration file")
    }

    pub fn server_info(&self) -> ServerInfo {
        let info = ServerInfo::new(&self.server.name, env!("CARGO_PKG_VERSION"));
        match &self.server.vendor {
            Some(vendor) => info.with_vendor(vendor),
            None => info,
        }
    }

    pub fn build_server(&self) -> McpServer {
        let registry = ToolRegistry::builtin();
        tracing::info!("Registered {} tools", registry.len());

        McpServer::new(registry, self.server_info())
            .with_require_handshake(self.mcp.require_handshake)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
    /// One handshake state for every HTTP request
    pub handshake: Arc<HandshakeState>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            server: Arc::new(config.build_server()),
            handshake: Arc::new(HandshakeState::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.server.name, "weather-mcp");
        assert!(config.server.vendor.is_none());
        assert!(!config.mcp.require_handshake);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nname = \"forecaster\"\nvendor = \"Acme\"\n\n[mcp]\nrequire_handshake = true\n"
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.server.name, "forecaster");
        assert!(config.mcp.require_handshake);

        let info = config.server_info();
        assert_eq!(info.vendor.as_deref(), Some("Acme"));
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mcp]\nrequire_handshake = \"sometimes\"").unwrap();

        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
    }
}
