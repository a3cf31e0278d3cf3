// Built-in tool catalog
//
// Definitions are plain data. Adding a tool means adding a definition here and
// an implementation of `Tool` that returns it.

use super::{Tool, WeatherTool};
use std::sync::Arc;
use weather_mcp_core::weather::Units;
use weather_mcp_core::{ObjectSchema, PropertySchema, ToolDefinition};

pub const GET_WEATHER: &str = "get_weather";

pub fn get_weather() -> ToolDefinition {
    ToolDefinition::new(
        GET_WEATHER,
        "Get current weather information for a location",
        ObjectSchema::new()
            .property(
                PropertySchema::string("location", "City name or location to get weather for")
                    .required()
                    .invalid_message("location must be a non-empty string"),
            )
            .property(
                PropertySchema::string("units", "Unit system for measurements (default: metric)")
                    .allowed(Units::ALL),
            ),
    )
    .with_returns(
        ObjectSchema::new()
            .property(PropertySchema::string("location", "Location the report is for").required())
            .property(PropertySchema::number("temperature", "Temperature in °C or °F").required())
            .property(PropertySchema::string("condition", "Sky condition").required())
            .property(PropertySchema::number("humidity", "Relative humidity in percent").required())
            .property(PropertySchema::number("wind_speed", "Wind speed in km/h or mph").required())
            .property(
                PropertySchema::string("units", "Unit system used")
                    .allowed(Units::ALL)
                    .required(),
            ),
    )
}

/// Every tool the server ships with
pub fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(WeatherTool::new())]
}
