// MCP server: transport-agnostic dispatch core

use crate::dispatch::{classify, Message};
use crate::error::McpError;
use crate::handshake::{HandshakeGate, HandshakeState};
use crate::invoker::ToolInvoker;
use crate::protocol::{
    BatchRequest, BatchResponse, ErrorBody, ErrorEnvelope, InitializeResponse,
    IntrospectionResponse, ServerInfo, ToolResult,
};
use crate::tools::ToolRegistry;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Response to one inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Initialized(InitializeResponse),
    Rejected(ErrorEnvelope),
    Batch(BatchResponse),
    Introspection(IntrospectionResponse),
    /// The message could not be parsed; carries the parse error text
    Malformed(String),
}

impl Reply {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl Serialize for Reply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Initialized(response) => response.serialize(serializer),
            Self::Rejected(envelope) => envelope.serialize(serializer),
            Self::Batch(response) => response.serialize(serializer),
            Self::Introspection(response) => response.serialize(serializer),
            Self::Malformed(reason) => {
                BatchResponse::error_only(McpError::Malformed(reason.clone())).serialize(serializer)
            }
        }
    }
}

/// Routes classified messages to the handshake gate or the tool invoker
pub struct McpServer {
    invoker: ToolInvoker,
    gate: HandshakeGate,
    require_handshake: bool,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, server_info: ServerInfo) -> Self {
        Self {
            invoker: ToolInvoker::new(Arc::new(registry)),
            gate: HandshakeGate::new(server_info),
            require_handshake: false,
        }
    }

    /// Refuse tool calls on sessions that have not completed the handshake.
    pub fn with_require_handshake(mut self, require: bool) -> Self {
        self.require_handshake = require;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.invoker.registry()
    }

    pub fn introspection(&self) -> IntrospectionResponse {
        self.registry().introspection()
    }

    /// Classify and handle one raw message.
    pub async fn handle_raw(&self, session: &HandshakeState, raw: &str) -> Reply {
        self.handle(session, classify(raw)).await
    }

    pub async fn handle(&self, session: &HandshakeState, message: Message) -> Reply {
        match message {
            Message::Handshake(request) => match self.gate.negotiate(session, &request) {
                Ok(response) => Reply::Initialized(response),
                Err(err) => Reply::Rejected(ErrorEnvelope {
                    error: ErrorBody::from(&err),
                }),
            },
            Message::Batch(batch) => Reply::Batch(self.handle_batch(session, batch).await),
            Message::Introspection => Reply::Introspection(self.introspection()),
            Message::Malformed(reason) => {
                tracing::error!("Failed to decode request: {}", reason);
                Reply::Malformed(reason)
            }
        }
    }

    async fn handle_batch(&self, session: &HandshakeState, batch: BatchRequest) -> BatchResponse {
        if self.require_handshake && !session.is_initialized() {
            tracing::warn!(calls = batch.tools.len(), "Tool calls before handshake refused");
            return BatchResponse {
                results: batch
                    .tools
                    .into_iter()
                    .map(|call| ToolResult::failure(call.id, McpError::NotInitialized))
                    .collect(),
            };
        }

        tracing::debug!(calls = batch.tools.len(), "Processing batch");
        self.invoker.invoke_batch(batch.tools).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PROTOCOL_VERSION;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(ToolRegistry::builtin(), ServerInfo::new("weather-mcp", "0.1.0"))
    }

    const BATCH: &str = r#"{"tools":[{"id":"1","name":"get_weather","params":{"location":"Paris"}}]}"#;

    #[tokio::test]
    async fn test_handshake_reply() {
        let session = HandshakeState::new();
        let reply = server()
            .handle_raw(&session, r#"{"protocolVersion":"2024-11-05","capabilities":{}}"#)
            .await;

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["serverInfo"]["name"], "weather-mcp");
        assert_eq!(value["capabilities"]["tools"], true);
        assert!(session.is_initialized());
    }

    #[tokio::test]
    async fn test_handshake_rejected_reply() {
        let session = HandshakeState::new();
        let reply = server()
            .handle_raw(&session, r#"{"protocolVersion":"0.1"}"#)
            .await;

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["error"]["code"], "unsupported_version");
        assert!(value["error"]["message"].as_str().unwrap().contains("0.1"));
        assert!(!session.is_initialized());
    }

    #[tokio::test]
    async fn test_tool_calls_allowed_before_handshake_by_default() {
        let session = HandshakeState::new();
        let reply = server().handle_raw(&session, BATCH).await;

        match reply {
            Reply::Batch(response) => {
                assert_eq!(response.results.len(), 1);
                assert!(!response.results[0].is_error());
            }
            other => panic!("expected batch reply, got {:?}", other),
        }
        assert!(!session.is_initialized());
    }

    #[tokio::test]
    async fn test_strict_mode_refuses_calls_before_handshake() {
        let server = server().with_require_handshake(true);
        let session = HandshakeState::new();

        let value = serde_json::to_value(server.handle_raw(&session, BATCH).await).unwrap();
        assert_eq!(value["results"][0]["id"], "1");
        assert_eq!(value["results"][0]["error"]["code"], "not_initialized");

        server
            .handle_raw(&session, r#"{"protocolVersion":"2024-11-05"}"#)
            .await;
        let value = serde_json::to_value(server.handle_raw(&session, BATCH).await).unwrap();
        assert_eq!(value["results"][0]["result"]["location"], "Paris");
    }

    #[tokio::test]
    async fn test_introspection_reply() {
        let session = HandshakeState::new();
        let value = serde_json::to_value(
            server().handle_raw(&session, r#"{"introspect":true}"#).await,
        )
        .unwrap();

        assert_eq!(value["version"], PROTOCOL_VERSION);
        assert_eq!(value["tools"][0]["name"], "get_weather");
    }

    #[tokio::test]
    async fn test_malformed_reply_is_batch_shaped() {
        let session = HandshakeState::new();
        let reply = server().handle_raw(&session, "garbage").await;
        assert!(reply.is_malformed());

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["results"][0]["id"], "");
        assert_eq!(value["results"][0]["error"]["code"], "invalid_request");
        assert!(value["results"][0]["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request format:"));
    }

    #[tokio::test]
    async fn test_batch_results_match_request_order() {
        let session = HandshakeState::new();
        let raw = json!({
            "tools": [
                {"id": "x", "name": "get_weather", "params": {"location": "Lima"}},
                {"id": "y", "name": "unknown"},
                {"id": "z", "name": "get_weather", "params": {"location": "Paris", "units": "kelvin"}}
            ]
        })
        .to_string();

        let value = serde_json::to_value(server().handle_raw(&session, &raw).await).unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["id"], "x");
        assert_eq!(results[1]["id"], "y");
        assert_eq!(results[1]["error"]["code"], "unknown_tool");
        assert!(results[1].get("result").is_none());
        assert_eq!(results[2]["id"], "z");
        assert!(results[2].get("error").is_some());
    }
}
