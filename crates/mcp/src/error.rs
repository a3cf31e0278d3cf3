use weather_mcp_core::ToolError;

pub type McpResult<T> = Result<T, McpError>;

/// Protocol-level errors
///
/// Every variant maps to a stable machine-readable code through
/// [`McpError::code`]; the display text is the human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("unsupported protocol version '{requested}', server supports '{supported}'")]
    UnsupportedVersion { requested: String, supported: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Invalid request format: {0}")]
    Malformed(String),

    #[error("session not initialized, complete the handshake first")]
    NotInitialized,

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    pub const UNKNOWN_TOOL: &'static str = "unknown_tool";
    pub const UNSUPPORTED_VERSION: &'static str = "unsupported_version";
    pub const TOOL_EXECUTION_ERROR: &'static str = "tool_execution_error";
    pub const INVALID_REQUEST: &'static str = "invalid_request";
    pub const NOT_INITIALIZED: &'static str = "not_initialized";
    pub const INTERNAL_ERROR: &'static str = "internal_error";

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion { .. } => Self::UNSUPPORTED_VERSION,
            Self::UnknownTool(_) => Self::UNKNOWN_TOOL,
            Self::Tool(_) => Self::TOOL_EXECUTION_ERROR,
            Self::Malformed(_) => Self::INVALID_REQUEST,
            Self::NotInitialized => Self::NOT_INITIALIZED,
            Self::Encode(_) | Self::Io(_) => Self::INTERNAL_ERROR,
        }
    }
}
