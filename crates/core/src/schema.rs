// Declarative tool schemas and schema-driven parameter validation

use crate::error::ToolError;
use crate::types::{ParamBag, ParamValue};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Primitive parameter types a tool may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::String, ParamValue::String(_))
                | (Self::Number, ParamValue::Number(_))
                | (Self::Boolean, ParamValue::Bool(_))
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named property of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    pub kind: PrimitiveType,
    pub description: String,
    pub allowed: Option<Vec<String>>,
    pub required: bool,
    /// Replaces the generic type-mismatch message
    pub invalid_message: Option<String>,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, kind: PrimitiveType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            allowed: None,
            required: false,
            invalid_message: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::String, description)
    }

    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Number, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Boolean, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict a string property to a fixed set of values.
    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Message reported when the value has the wrong type.
    pub fn invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    fn validate(&self, value: Option<&ParamValue>) -> Result<(), ToolError> {
        let Some(value) = value else {
            if self.required {
                return Err(ToolError::MissingParameter {
                    name: self.name.clone(),
                });
            }
            return Ok(());
        };

        if !self.kind.matches(value) {
            return Err(match &self.invalid_message {
                Some(message) => ToolError::InvalidValue(message.clone()),
                None => ToolError::InvalidType {
                    name: self.name.clone(),
                    expected: self.kind,
                },
            });
        }

        if let (Some(allowed), Some(s)) = (&self.allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == s) {
                return Err(ToolError::NotAllowed {
                    name: self.name.clone(),
                    allowed: allowed.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Serialize for PropertySchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.allowed.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("description", &self.description)?;
        if let Some(allowed) = &self.allowed {
            map.serialize_entry("enum", allowed)?;
        }
        map.end()
    }
}

/// Ordered set of named properties, serialized as a JSON-schema object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    properties: Vec<PropertySchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Check a parameter bag against this schema.
    ///
    /// Properties are checked in declaration order and the first failure wins.
    /// Parameters the schema does not declare are ignored.
    pub fn validate(&self, params: &ParamBag) -> Result<(), ToolError> {
        for property in &self.properties {
            property.validate(params.get(&property.name))?;
        }
        Ok(())
    }
}

impl Serialize for ObjectSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [PropertySchema]);

        impl Serialize for Properties<'_> {
            fn serialize<M: Serializer>(&self, serializer: M) -> Result<M::Ok, M::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for property in self.0 {
                    map.serialize_entry(&property.name, property)?;
                }
                map.end()
            }
        }

        let required: Vec<&str> = self.required().collect();
        let len = if required.is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &Properties(&self.properties))?;
        if !required.is_empty() {
            map.serialize_entry("required", &required)?;
        }
        map.end()
    }
}

/// Catalog entry describing one invocable tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ObjectSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<ObjectSchema>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ObjectSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            returns: None,
        }
    }

    pub fn with_returns(mut self, returns: ObjectSchema) -> Self {
        self.returns = Some(returns);
        self
    }
}
