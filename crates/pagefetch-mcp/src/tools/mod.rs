//! MCP tool implementations.

pub mod fetch_api;
pub mod process_data;
pub mod registry;

pub use registry::ToolRegistry;
