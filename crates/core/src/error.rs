use crate::schema::PrimitiveType;

/// Errors raised while validating or executing a single tool call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("{name} parameter is required")]
    MissingParameter { name: String },

    #[error("{name} must be a {expected}")]
    InvalidType { name: String, expected: PrimitiveType },

    #[error("{name} must be {}", describe_allowed(.allowed))]
    NotAllowed { name: String, allowed: Vec<String> },

    #[error("parameter '{name}' has unsupported type {found}")]
    UnsupportedValue { name: String, found: &'static str },

    #[error("{0}")]
    InvalidValue(String),

    #[error("tool execution failed: {0}")]
    Execution(String),
}

fn describe_allowed(allowed: &[String]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.as_slice() {
        [] => "empty".to_string(),
        [only] => only.clone(),
        [first, second] => format!("either {} or {}", first, second),
        [rest @ .., last] => format!("one of {} or {}", rest.join(", "), last),
    }
}
