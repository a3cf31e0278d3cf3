pub mod catalog;
pub mod weather;
mod registry;

pub use registry::{Tool, ToolEntry, ToolRegistry};
pub use weather::WeatherTool;
