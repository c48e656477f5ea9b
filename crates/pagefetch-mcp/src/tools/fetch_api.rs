//! Tool: fetch_api. Perform one HTTP request, optionally extracting the embedded record.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use pagefetch::{transform, FetchResult, HttpMethod, OutputFormat, RawInput, RequestSpec};

use crate::context::ToolContext;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

pub const NAME: &str = "fetch_api";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchApiParams {
    url: Url,
    #[serde(default)]
    method: HttpMethod,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    extract_mass_data: bool,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Make an HTTP request to an API endpoint or web page. JSON responses are \
             returned pretty-printed; anything else is returned as raw text."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "format": "uri", "description": "Absolute URL to request" },
                "method": {
                    "type": "string",
                    "enum": ["GET", "POST", "PUT", "DELETE"],
                    "default": "GET"
                },
                "headers": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Extra request headers"
                },
                "body": { "type": "string", "description": "Request body for POST/PUT" },
                "extractMassData": {
                    "type": "boolean",
                    "default": false,
                    "description": "Extract the record embedded in an HTML page's __NEXT_DATA__ script"
                }
            },
            "required": ["url"]
        }),
    }
}

pub async fn execute(args: Value, context: &ToolContext) -> McpResult<ToolCallResult> {
    let params: FetchApiParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let spec = RequestSpec {
        url: params.url,
        method: params.method,
        headers: params.headers,
        body: params.body,
    };

    tracing::info!("fetch_api {} {}", spec.method, spec.url);
    let result = context.fetcher().fetch(&spec).await?;

    if !params.extract_mass_data {
        return Ok(ToolCallResult::text(result.into_text()));
    }

    // A JSON string body is treated as text, as process_data does.
    let text = match RawInput::from(result) {
        raw @ RawInput::Text(_) => {
            transform(&raw, OutputFormat::Detailed, None, context.extractor()).to_pretty_string()
        }
        RawInput::Json(value) => FetchResult::Json(value).into_text(),
    };

    Ok(ToolCallResult::text(text))
}
