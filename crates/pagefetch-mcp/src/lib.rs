//! pagefetch MCP server: HTTP requests and embedded page-data extraction for LLM agents.

pub mod config;
pub mod context;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{ConfigOverrides, ServerConfig};
pub use context::ToolContext;
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;
