pub mod stdio;

pub use stdio::{serve, StdioTransport};
