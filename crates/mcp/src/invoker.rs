// Tool invocation: lookup, validation, execution and fault isolation

use crate::error::{McpError, McpResult};
use crate::protocol::{BatchResponse, ToolCall, ToolResult};
use crate::tools::ToolRegistry;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use weather_mcp_core::{ParamBag, ToolError};

/// Runs tool calls against a registry
///
/// Every failure is converted into an error [`ToolResult`]; nothing escapes
/// to the transport.
#[derive(Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke one tool call and return its result with the caller's id.
    pub async fn invoke(&self, call: ToolCall) -> ToolResult {
        tracing::info!(tool = %call.name, id = %call.id, "Processing tool call");

        let ToolCall { id, name, params } = call;
        match self.execute(&name, params.unwrap_or_default()).await {
            Ok(value) => ToolResult::success(id, value),
            Err(err) => {
                tracing::warn!(tool = %name, id = %id, code = err.code(), "Tool call failed: {}", err);
                ToolResult::failure(id, &err)
            }
        }
    }

    /// Invoke calls one after another, preserving order.
    pub async fn invoke_batch(&self, calls: Vec<ToolCall>) -> BatchResponse {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.invoke(call).await);
        }
        BatchResponse { results }
    }

    async fn execute(
        &self,
        name: &str,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> McpResult<serde_json::Value> {
        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        let params = ParamBag::from_json(params)?;
        entry.definition().parameters.validate(&params)?;

        let tool = entry.tool();
        match AssertUnwindSafe(tool.execute(params)).catch_unwind().await {
            Ok(result) => Ok(result?),
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::error!(tool = %name, error = %msg, "Tool panicked");
                Err(ToolError::Execution(format!("tool panicked: {}", msg)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use serde_json::json;
    use weather_mcp_core::{ObjectSchema, ToolDefinition};

    struct PanickingTool;

    #[async_trait::async_trait]
    impl Tool for PanickingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("explode", "Always panics", ObjectSchema::new())
        }

        async fn execute(&self, _params: ParamBag) -> Result<serde_json::Value, ToolError> {
            panic!("kaboom")
        }
    }

    fn invoker() -> ToolInvoker {
        ToolInvoker::new(Arc::new(ToolRegistry::builtin()))
    }

    #[tokio::test]
    async fn test_invoke_success_defaults_units() {
        let result = invoker()
            .invoke(ToolCall::new("1", "get_weather", json!({"location": "Paris"})))
            .await;

        assert_eq!(result.id, "1");
        let value = result.result().unwrap();
        assert_eq!(value["location"], "Paris");
        assert_eq!(value["units"], "metric");
    }

    #[tokio::test]
    async fn test_invoke_name_is_case_insensitive() {
        let result = invoker()
            .invoke(ToolCall::new("1", "GET_Weather", json!({"location": "Oslo"})))
            .await;
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let result = invoker()
            .invoke(ToolCall::new("7", "get_forecast", json!({})))
            .await;

        assert_eq!(result.id, "7");
        assert!(result.result().is_none());
        let error = result.error().unwrap();
        assert_eq!(error.code, "unknown_tool");
        assert!(error.message.contains("get_forecast"));
    }

    #[tokio::test]
    async fn test_invoke_missing_location() {
        let result = invoker()
            .invoke(ToolCall::new("2", "get_weather", json!({"units": "metric"})))
            .await;

        assert!(result.result().is_none());
        let error = result.error().unwrap();
        assert_eq!(error.code, "tool_execution_error");
        assert_eq!(error.message, "location parameter is required");
    }

    #[tokio::test]
    async fn test_invoke_non_string_location() {
        let result = invoker()
            .invoke(ToolCall::new("5", "get_weather", json!({"location": 42})))
            .await;

        let error = result.error().unwrap();
        assert_eq!(error.code, "tool_execution_error");
        assert_eq!(error.message, "location must be a non-empty string");
    }

    #[tokio::test]
    async fn test_invoke_invalid_units() {
        let result = invoker()
            .invoke(ToolCall::new(
                "3",
                "get_weather",
                json!({"location": "Paris", "units": "kelvin"}),
            ))
            .await;

        let error = result.error().unwrap();
        assert_eq!(error.code, "tool_execution_error");
        assert!(error.message.contains("'metric'"));
        assert!(error.message.contains("'imperial'"));
    }

    #[tokio::test]
    async fn test_invoke_nested_param_rejected_per_call() {
        let result = invoker()
            .invoke(ToolCall::new("4", "get_weather", json!({"location": {"city": "Paris"}})))
            .await;

        assert_eq!(result.error().unwrap().code, "tool_execution_error");
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let calls = vec![
            ToolCall::new("a", "get_weather", json!({"location": "Paris"})),
            ToolCall::new("b", "nope", json!({})),
            ToolCall::new("c", "get_weather", json!({})),
            ToolCall::new("", "get_weather", json!({"location": "Rome", "units": "imperial"})),
        ];

        let response = invoker().invoke_batch(calls).await;
        let ids: Vec<&str> = response.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", ""]);

        assert!(!response.results[0].is_error());
        assert!(response.results[1].is_error());
        assert!(response.results[2].is_error());
        assert_eq!(response.results[3].result().unwrap()["units"], "imperial");
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let mut registry = ToolRegistry::builtin();
        registry.register(Arc::new(PanickingTool));
        let invoker = ToolInvoker::new(Arc::new(registry));

        let response = invoker
            .invoke_batch(vec![
                ToolCall::new("1", "explode", json!({})),
                ToolCall::new("2", "get_weather", json!({"location": "Paris"})),
            ])
            .await;

        let error = response.results[0].error().unwrap();
        assert_eq!(error.code, "tool_execution_error");
        assert!(error.message.contains("kaboom"));
        assert!(!response.results[1].is_error());
    }
}
