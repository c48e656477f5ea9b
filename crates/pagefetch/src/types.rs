//! Core data types for requests, fetch results, and transform outcomes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use url::Url;

/// HTTP methods accepted by the fetcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single outbound HTTP call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl RequestSpec {
    /// A bare GET with no headers and no body.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            headers: HashMap::new(),
            body: None,
        }
    }
}

/// What the fetcher hands back: parsed JSON or the raw body text.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Json(Value),
    Text(String),
}

impl FetchResult {
    /// Render for a text-only channel. JSON is pretty-printed, text is returned verbatim.
    pub fn into_text(self) -> String {
        match self {
            FetchResult::Json(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|e| e.to_string())
            }
            FetchResult::Text(text) => text,
        }
    }
}

impl From<FetchResult> for RawInput {
    fn from(result: FetchResult) -> Self {
        match result {
            FetchResult::Json(Value::String(s)) => RawInput::Text(s),
            FetchResult::Json(value) => RawInput::Json(value),
            FetchResult::Text(text) => RawInput::Text(text),
        }
    }
}

/// Input to the transformer.
///
/// `Text` is the only branch eligible for script-block extraction; `Json`
/// always takes the passthrough path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawInput {
    Text(String),
    Json(Value),
}

impl RawInput {
    /// Try to read `data` as JSON, keeping it as opaque text when that fails.
    ///
    /// A payload that parses to a bare JSON string is unwrapped to `Text`.
    pub fn parse_optimistic(data: String) -> Self {
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::String(inner)) => RawInput::Text(inner),
            Ok(value) => RawInput::Json(value),
            Err(_) => RawInput::Text(data),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawInput::Text(text) => Some(text),
            RawInput::Json(_) => None,
        }
    }
}

/// Output shape selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Compact,
    #[default]
    Detailed,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Compact => "compact",
            OutputFormat::Detailed => "detailed",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(OutputFormat::Compact),
            "detailed" => Ok(OutputFormat::Detailed),
            other => Err(format!(
                "unknown format '{other}', expected 'compact' or 'detailed'"
            )),
        }
    }
}

/// A complete transform request.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub data: RawInput,
    pub format: OutputFormat,
    pub filter_fields: Option<Vec<String>>,
}

/// Reportable extraction failures. These are returned as data, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The marker is present but no matching script element was found.
    ScriptNotFound { script_id: String },
    /// The script body is not valid JSON.
    ParseFailed { message: String },
    /// The record path did not resolve to a value.
    RecordNotFound { field: String },
}

impl ExtractionError {
    pub fn error(&self) -> String {
        match self {
            ExtractionError::ScriptNotFound { script_id } => {
                format!("{script_id} script content not found")
            }
            ExtractionError::ParseFailed { .. } => "Failed to parse script data".to_string(),
            ExtractionError::RecordNotFound { field } => {
                format!("{field} data not found in the provided HTML")
            }
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ExtractionError::ParseFailed { message } => Some(message),
            _ => None,
        }
    }
}

impl Serialize for ExtractionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let message = self.message();
        let mut map = serializer.serialize_map(Some(1 + usize::from(message.is_some())))?;
        map.serialize_entry("error", &self.error())?;
        if let Some(message) = message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

/// Four-field summary view of an extracted record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<Value>,
    pub region_price_rank_content: Vec<Value>,
}

/// Fallback wrapper for input that carries no embedded script block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passthrough {
    pub processed: bool,
    pub data: RawInput,
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_fields: Option<Vec<String>>,
}

/// Everything the transformer can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransformResult {
    /// Detailed record, possibly filtered.
    Record(Value),
    Compact(CompactRecord),
    Failed(ExtractionError),
    Passthrough(Passthrough),
}

impl TransformResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, TransformResult::Failed(_))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| e.to_string())
    }
}

/// Errors from the HTTP fetcher.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("API request failed: invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("API request failed: {0}")]
    Network(String),

    #[error("API request failed: HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("API request failed: invalid JSON body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}

/// Errors building an extractor configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Marker must not be empty")]
    EmptyMarker,

    #[error("Record path must name at least one field")]
    EmptyRecordPath,

    #[error("Script id must not be empty")]
    EmptyScriptId,

    #[error("Invalid script pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type FetchOutcome<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_optimistic_object() {
        let raw = RawInput::parse_optimistic(r#"{"a":1}"#.to_string());
        assert_eq!(raw, RawInput::Json(json!({"a": 1})));
    }

    #[test]
    fn test_parse_optimistic_falls_back_to_text() {
        let raw = RawInput::parse_optimistic("not json".to_string());
        assert_eq!(raw, RawInput::Text("not json".to_string()));
    }

    #[test]
    fn test_parse_optimistic_unwraps_json_string() {
        let raw = RawInput::parse_optimistic(r#""<html></html>""#.to_string());
        assert_eq!(raw, RawInput::Text("<html></html>".to_string()));
    }

    #[test]
    fn test_extraction_error_shape() {
        let err = ExtractionError::ParseFailed {
            message: "expected value".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "Failed to parse script data", "message": "expected value"})
        );

        let err = ExtractionError::RecordNotFound {
            field: "mass".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "mass data not found in the provided HTML"})
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("compact".parse::<OutputFormat>(), Ok(OutputFormat::Compact));
        assert_eq!("detailed".parse::<OutputFormat>(), Ok(OutputFormat::Detailed));
        assert!("summary".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_method_deserialize() {
        let m: HttpMethod = serde_json::from_value(json!("DELETE")).unwrap();
        assert_eq!(m, HttpMethod::Delete);
        assert!(serde_json::from_value::<HttpMethod>(json!("PATCH")).is_err());
    }

    #[test]
    fn test_fetch_result_into_text() {
        assert_eq!(FetchResult::Text("plain".into()).into_text(), "plain");
        assert_eq!(
            FetchResult::Json(json!({"k": "v"})).into_text(),
            "{\n  \"k\": \"v\"\n}"
        );
    }
}
