//! Tool: process_data. Filter and reshape a JSON or HTML payload.

use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use pagefetch::{
    apply, ExtractorConfig, OutputFormat, RawInput, TransformRequest, TransformResult,
};

use crate::context::ToolContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

pub const NAME: &str = "process_data";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessDataParams {
    data: String,
    #[serde(default)]
    format: OutputFormat,
    #[serde(default)]
    filter_fields: Option<Vec<String>>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Process JSON or HTML data: extract the embedded page record, keep selected \
             fields, and return it in compact or detailed form."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "data": { "type": "string", "description": "JSON text or an HTML document" },
                "format": {
                    "type": "string",
                    "enum": ["compact", "detailed"],
                    "default": "detailed"
                },
                "filterFields": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Keep only these fields, in this order"
                }
            },
            "required": ["data"]
        }),
    }
}

pub async fn execute(args: Value, context: &ToolContext) -> McpResult<ToolCallResult> {
    let params: ProcessDataParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let request = TransformRequest {
        data: RawInput::parse_optimistic(params.data),
        format: params.format,
        filter_fields: params.filter_fields,
    };
    tracing::debug!(
        "process_data format={} json_input={}",
        request.format,
        matches!(request.data, RawInput::Json(_))
    );

    Ok(ToolCallResult::json(&apply(&request, context.extractor())))
}

/// Run the same pipeline over a file on disk.
pub fn transform_file(
    path: &Path,
    format: OutputFormat,
    filter_fields: Option<&[String]>,
    config: &ExtractorConfig,
) -> McpResult<TransformResult> {
    let request = TransformRequest {
        data: RawInput::parse_optimistic(std::fs::read_to_string(path)?),
        format,
        filter_fields: filter_fields.map(<[String]>::to_vec),
    };
    Ok(apply(&request, config))
}
