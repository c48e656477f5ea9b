//! Tool registration and dispatch.

use serde_json::Value;

use crate::context::ToolContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{fetch_api, process_data};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![fetch_api::definition(), process_data::definition()]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        context: &ToolContext,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            fetch_api::NAME => fetch_api::execute(args, context).await,
            process_data::NAME => process_data::execute(args, context).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
