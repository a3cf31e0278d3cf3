// MCP protocol types and definitions (newline-delimited JSON dialect)

use crate::error::McpError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weather_mcp_core::ToolDefinition;

/// Protocol version this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Capability name to enabled flag
pub type Capabilities = BTreeMap<String, bool>;

/// Structured error carried in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&McpError> for ErrorBody {
    fn from(err: &McpError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<McpError> for ErrorBody {
    fn from(err: McpError) -> Self {
        Self::from(&err)
    }
}

/// Top-level error response (handshake failures)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

// Handshake messages

/// Initialize request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeRequest {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl InitializeRequest {
    pub fn new(protocol_version: impl Into<String>) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            capabilities: Capabilities::new(),
            params: None,
        }
    }
}

/// Initialize response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: Capabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            vendor: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

// Tool call messages

/// Batch of tool calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub tools: Vec<ToolCall>,
}

/// One tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque correlation id, echoed back unchanged
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, params: serde_json::Value) -> Self {
        let params = match params {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        };
        Self {
            id: id.into(),
            name: name.into(),
            params,
        }
    }
}

/// Outcome of one tool call: either a result or an error, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(serde_json::Value),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ToolResult {
    pub fn success(id: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(id: impl Into<String>, error: impl Into<ErrorBody>) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Error(error.into()),
        }
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Result(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}

/// Results in the same order as the calls that produced them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<ToolResult>,
}

impl BatchResponse {
    /// Single anonymous error result, used when a message could not be processed at all.
    pub fn error_only(error: impl Into<ErrorBody>) -> Self {
        Self {
            results: vec![ToolResult::failure(String::new(), error)],
        }
    }
}

// Introspection

/// Tool catalog document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntrospectionResponse {
    pub version: String,
    pub tools: Vec<ToolDefinition>,
}
