//! Stdio transport for MCP
//!
//! Reads one newline-terminated JSON message at a time and answers each with
//! exactly one newline-terminated JSON response before reading the next.

use crate::error::{McpError, McpResult};
use crate::handshake::HandshakeState;
use crate::protocol::BatchResponse;
use crate::server::{McpServer, Reply};
use serde::Serialize;
use std::io;
use std::time::Duration;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::{error, info, trace};

/// Last-resort response when even the error envelope cannot be encoded
const ENCODE_FAILURE_LINE: &str = r#"{"results":[{"id":"","error":{"code":"internal_error","message":"Failed to encode response"}}]}"#;

/// Delay after the first failed read; doubles per consecutive failure
const READ_ERROR_BACKOFF_MIN: Duration = Duration::from_millis(10);
const READ_ERROR_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Newline-delimited message transport over a reader/writer pair
pub struct StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    reader: R,
    writer: W,
}

impl StdioTransport<BufReader<Stdin>, Stdout> {
    /// Create a new transport using actual stdin/stdout
    pub fn new() -> Self {
        Self::from_handles(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport from custom reader/writer handles
    pub fn from_handles(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Read the next line, without its terminator.
    ///
    /// Returns `Ok(None)` at end of input. Bytes are returned undecoded so an
    /// invalid UTF-8 line can still be answered.
    pub async fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut line).await?;
        if bytes_read == 0 {
            trace!("EOF reached on transport input");
            return Ok(None);
        }

        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Write one line and flush it.
    pub async fn write_line(&mut self, line: &str) -> io::Result<()> {
        trace!(message = %line, "Sending message");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Encode a reply as a single line of JSON.
pub fn encode_reply(reply: &Reply) -> String {
    encode_line(reply)
}

/// Encode any value as a single line of JSON.
///
/// An encoding failure still yields a line: a batch-shaped `internal_error`
/// envelope.
pub fn encode_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        let err = McpError::Encode(e);
        error!("{}", err);
        serde_json::to_string(&BatchResponse::error_only(err))
            .unwrap_or_else(|_| ENCODE_FAILURE_LINE.to_string())
    })
}

/// Serve one session until end of input.
///
/// Read errors are logged and the loop keeps waiting for input, backing off
/// while they repeat. A write error ends the session with an error.
pub async fn serve<R, W>(server: &McpServer, transport: &mut StdioTransport<R, W>) -> McpResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = HandshakeState::new();
    let mut backoff = READ_ERROR_BACKOFF_MIN;

    loop {
        let line = match transport.read_line().await {
            Ok(Some(line)) => {
                backoff = READ_ERROR_BACKOFF_MIN;
                line
            }
            Ok(None) => {
                info!("Stdin closed, exiting");
                return Ok(());
            }
            Err(e) => {
                error!("Error reading from stdin: {}", e);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(READ_ERROR_BACKOFF_MAX);
                continue;
            }
        };

        if line.iter().all(u8::is_ascii_whitespace) {
            trace!("Skipping empty line");
            continue;
        }

        let reply = match std::str::from_utf8(&line) {
            Ok(raw) => {
                trace!(message = %raw, "Received message");
                server.handle_raw(&session, raw).await
            }
            Err(e) => {
                error!("Failed to decode request: {}", e);
                Reply::Malformed(e.to_string())
            }
        };

        if let Err(e) = transport.write_line(&encode_reply(&reply)).await {
            error!("Failed to write response: {}", e);
            return Err(McpError::Io(e));
        }
    }
}
