// Message classification

use crate::protocol::{BatchRequest, InitializeRequest};
use serde_json::Value;

/// Field whose presence marks a handshake attempt
pub const HANDSHAKE_FIELD: &str = "protocolVersion";

/// Field that requests the tool catalog on the streaming transport
pub const INTROSPECT_FIELD: &str = "introspect";

/// Field carrying the tool calls of a batch
pub const BATCH_FIELD: &str = "tools";

/// A decoded inbound message
#[derive(Debug, Clone)]
pub enum Message {
    Handshake(InitializeRequest),
    Batch(BatchRequest),
    Introspection,
    /// Input that could not be parsed, with the parse error text
    Malformed(String),
}

/// Classify one raw message.
pub fn classify(raw: &str) -> Message {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => classify_value(value),
        Err(e) => Message::Malformed(e.to_string()),
    }
}

/// Classify an already-parsed message.
///
/// Only JSON objects are messages. A handshake is recognised by its protocol
/// version field, an introspection request by `"introspect": true` without a
/// `tools` list; anything else is parsed as a batch.
pub fn classify_value(value: Value) -> Message {
    if !value.is_object() {
        return Message::Malformed("expected a JSON object".to_string());
    }

    if value.get(HANDSHAKE_FIELD).is_some() {
        return match serde_json::from_value(value) {
            Ok(request) => Message::Handshake(request),
            Err(e) => Message::Malformed(e.to_string()),
        };
    }

    if value.get(INTROSPECT_FIELD).and_then(Value::as_bool) == Some(true)
        && value.get(BATCH_FIELD).is_none()
    {
        return Message::Introspection;
    }

    match serde_json::from_value(value) {
        Ok(batch) => Message::Batch(batch),
        Err(e) => Message::Malformed(e.to_string()),
    }
}
