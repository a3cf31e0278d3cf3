// Weather tool

use super::{catalog, Tool};
use weather_mcp_core::weather::get_weather;
use weather_mcp_core::{ParamBag, ToolDefinition, ToolError};

/// Returns current conditions for a location
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        catalog::get_weather()
    }

    async fn execute(&self, params: ParamBag) -> Result<serde_json::Value, ToolError> {
        let data = get_weather(&params)?;
        serde_json::to_value(data).map_err(|e| ToolError::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_returns_weather_record() {
        let tool = WeatherTool::new();
        let value = tool
            .execute(ParamBag::new().with("location", "Paris"))
            .await
            .unwrap();

        assert_eq!(value["location"], "Paris");
        assert_eq!(value["units"], "metric");
        assert_eq!(value["humidity"], 65);
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_units() {
        let tool = WeatherTool::new();
        let err = tool
            .execute(ParamBag::new().with("location", "Paris").with("units", "kelvin"))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::NotAllowed { .. }));
    }
}
