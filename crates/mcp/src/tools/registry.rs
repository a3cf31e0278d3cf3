// MCP tool trait and registry

use crate::protocol::{IntrospectionResponse, PROTOCOL_VERSION};
use std::collections::HashMap;
use std::sync::Arc;
use weather_mcp_core::{ParamBag, ToolDefinition, ToolError};

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's catalog entry
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with already-validated parameters
    async fn execute(&self, params: ParamBag) -> Result<serde_json::Value, ToolError>;
}

/// A registered tool together with the definition captured at registration
#[derive(Clone)]
pub struct ToolEntry {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

impl ToolEntry {
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn tool(&self) -> Arc<dyn Tool> {
        self.tool.clone()
    }
}

/// Tool registry for managing available tools
///
/// Lookup is case-insensitive. Registration order is the listing order.
pub struct ToolRegistry {
    tools: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registry populated with the built-in catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tool in super::catalog::builtin_tools() {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool, replacing any tool with the same (case-insensitive) name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let definition = tool.definition();
        let key = definition.name.to_lowercase();
        let entry = ToolEntry { definition, tool };

        match self.index.get(&key) {
            Some(&slot) => {
                tracing::warn!("Replacing registered tool: {}", entry.definition.name);
                self.tools[slot] = entry;
            }
            None => {
                self.index.insert(key, self.tools.len());
                self.tools.push(entry);
            }
        }
    }

    /// Get a tool by name
    pub fn lookup(&self, name: &str) -> Option<&ToolEntry> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| &self.tools[slot])
    }

    /// List all tool definitions in registration order
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn introspection(&self) -> IntrospectionResponse {
        IntrospectionResponse {
            version: PROTOCOL_VERSION.to_string(),
            tools: self.list(),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_mcp_core::{ObjectSchema, PropertySchema};

    struct EchoTool(&'static str);

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(
                self.0,
                "Echo the text parameter",
                ObjectSchema::new().property(PropertySchema::string("text", "Text to echo")),
            )
        }

        async fn execute(&self, params: ParamBag) -> Result<serde_json::Value, ToolError> {
            Ok(serde_json::json!(params.get_str("text")))
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ToolRegistry::builtin();
        assert!(registry.lookup("get_weather").is_some());
        assert!(registry.lookup("GET_WEATHER").is_some());
        assert!(registry.lookup("Get_Weather").is_some());
        assert!(registry.lookup("get_forecast").is_none());
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool("zulu")));
        registry.register(Arc::new(EchoTool("alpha")));

        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zulu", "alpha"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool("echo")));
        registry.register(Arc::new(EchoTool("ECHO")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].name, "ECHO");
    }

    #[test]
    fn test_introspection_is_stable() {
        let registry = ToolRegistry::builtin();
        let first = serde_json::to_string(&registry.introspection()).unwrap();
        let second = serde_json::to_string(&registry.introspection()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_introspection_shape() {
        let registry = ToolRegistry::builtin();
        let value = serde_json::to_value(registry.introspection()).unwrap();

        assert_eq!(value["version"], PROTOCOL_VERSION);
        let tool = &value["tools"][0];
        assert_eq!(tool["name"], "get_weather");
        assert_eq!(tool["parameters"]["type"], "object");
        assert_eq!(tool["parameters"]["required"], serde_json::json!(["location"]));
        assert_eq!(
            tool["parameters"]["properties"]["units"]["enum"],
            serde_json::json!(["metric", "imperial"])
        );
        assert_eq!(tool["returns"]["type"], "object");
    }
}
