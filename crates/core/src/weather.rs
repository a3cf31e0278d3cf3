// Weather lookup (stub data until a real provider is wired in)

use crate::error::ToolError;
use crate::types::ParamBag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system for reported measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub const ALL: [&'static str; 2] = ["metric", "imperial"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            _ => Err(ToolError::NotAllowed {
                name: "units".to_string(),
                allowed: Units::ALL.iter().map(|u| u.to_string()).collect(),
            }),
        }
    }
}

/// Weather information for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub location: String,
    /// Degrees Celsius or Fahrenheit depending on `units`
    pub temperature: f64,
    pub condition: String,
    /// Relative humidity, percent
    pub humidity: u8,
    /// km/h or mph depending on `units`
    pub wind_speed: f64,
    pub units: Units,
}

/// Look up the weather for `params["location"]`.
///
/// `units` defaults to metric. A non-string `units` value is rejected rather
/// than silently ignored.
pub fn get_weather(params: &ParamBag) -> Result<WeatherData, ToolError> {
    let location = match params.get("location") {
        None => {
            return Err(ToolError::MissingParameter {
                name: "location".to_string(),
            })
        }
        Some(value) => match value.as_str() {
            Some(s) if !s.is_empty() => s,
            _ => {
                return Err(ToolError::InvalidValue(
                    "location must be a non-empty string".to_string(),
                ))
            }
        },
    };

    let units = match params.get("units") {
        None => Units::default(),
        Some(value) => value
            .as_str()
            .ok_or_else(|| ToolError::InvalidType {
                name: "units".to_string(),
                expected: crate::schema::PrimitiveType::String,
            })?
            .parse()?,
    };

    Ok(WeatherData {
        location: location.to_string(),
        temperature: 22.5,
        condition: "Partly Cloudy".to_string(),
        humidity: 65,
        wind_speed: 10.5,
        units,
    })
}
