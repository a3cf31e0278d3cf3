// MCP (Model Context Protocol) server implementation
// Exposes the tool catalog to clients over stdio or HTTP

pub mod dispatch;
pub mod error;
pub mod handshake;
pub mod invoker;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use error::{McpError, McpResult};
pub use handshake::{HandshakeGate, HandshakeState};
pub use server::{McpServer, Reply};
