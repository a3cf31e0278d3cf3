// Core types and functionality for the weather MCP server

pub mod error;
pub mod schema;
pub mod types;
pub mod weather;

pub use error::ToolError;
pub use schema::{ObjectSchema, PrimitiveType, PropertySchema, ToolDefinition};
pub use types::*;
