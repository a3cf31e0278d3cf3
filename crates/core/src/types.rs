use crate::error::ToolError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single dynamically-typed tool parameter.
///
/// Absent values are represented by the key not being in the [`ParamBag`];
/// JSON `null` is folded into absence when a bag is built from the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert one JSON value. `Ok(None)` means the value is absent.
    pub fn from_json(name: &str, value: serde_json::Value) -> Result<Option<Self>, ToolError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(Self::Bool(b))),
            Value::Number(n) => n
                .as_f64()
                .map(|n| Some(Self::Number(n)))
                .ok_or_else(|| ToolError::UnsupportedValue {
                    name: name.to_string(),
                    found: "number",
                }),
            Value::String(s) => Ok(Some(Self::String(s))),
            Value::Array(_) => Err(ToolError::UnsupportedValue {
                name: name.to_string(),
                found: "array",
            }),
            Value::Object(_) => Err(ToolError::UnsupportedValue {
                name: name.to_string(),
                found: "object",
            }),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Named parameters for one tool call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamBag(BTreeMap<String, ParamValue>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from loosely-typed wire parameters.
    pub fn from_json(params: serde_json::Map<String, serde_json::Value>) -> Result<Self, ToolError> {
        let mut bag = Self::new();
        for (name, value) in params {
            if let Some(value) = ParamValue::from_json(&name, value)? {
                bag.0.insert(name, value);
            }
        }
        Ok(bag)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
