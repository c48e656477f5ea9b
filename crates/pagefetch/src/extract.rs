//! Locate and decode the JSON payload embedded in a page's hydration script.

use regex::Regex;
use serde_json::Value;

use crate::types::{ConfigError, ExtractionError};

/// Marker whose presence switches the transformer into extraction mode.
pub const DEFAULT_MARKER: &str = "__NEXT_DATA__";
/// `id` attribute of the hydration script element.
pub const DEFAULT_SCRIPT_ID: &str = "__NEXT_DATA__";
/// Dotted path from the script's JSON root to the record of interest.
pub const DEFAULT_RECORD_PATH: &str = "props.pageProps.mass";

/// Where to look for the embedded record.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    marker: String,
    script_id: String,
    record_path: Vec<String>,
    script_re: Regex,
}

impl ExtractorConfig {
    pub fn new(marker: &str, script_id: &str, record_path: &str) -> Result<Self, ConfigError> {
        if marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if script_id.is_empty() {
            return Err(ConfigError::EmptyScriptId);
        }

        let record_path: Vec<String> = record_path
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if record_path.is_empty() {
            return Err(ConfigError::EmptyRecordPath);
        }

        // Shortest body up to the first closing tag.
        let pattern = format!(
            r#"(?is)<script\b[^>]*\bid\s*=\s*["']{id}["'][^>]*\btype\s*=\s*["']application/json["'][^>]*>(.*?)</script>"#,
            id = regex::escape(script_id)
        );
        let script_re = Regex::new(&pattern)?;

        Ok(Self {
            marker: marker.to_string(),
            script_id: script_id.to_string(),
            record_path,
            script_re,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    pub fn record_path(&self) -> &[String] {
        &self.record_path
    }

    /// Last path segment, used to name the record in error messages.
    pub fn record_name(&self) -> &str {
        self.record_path.last().map(String::as_str).unwrap_or_default()
    }

    /// Whether `text` should go through extraction at all.
    pub fn has_marker(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER, DEFAULT_SCRIPT_ID, DEFAULT_RECORD_PATH)
            .expect("default extractor config is valid")
    }
}

/// Inner text of the first matching script element.
pub fn find_script_body<'a>(html: &'a str, config: &ExtractorConfig) -> Option<&'a str> {
    config
        .script_re
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Follow `path` through nested objects. `null` counts as absent.
pub fn resolve_path<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, key| node.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

/// Run the script lookup, JSON parse, and record lookup.
pub fn extract_record(html: &str, config: &ExtractorConfig) -> Result<Value, ExtractionError> {
    let body = find_script_body(html, config).ok_or_else(|| ExtractionError::ScriptNotFound {
        script_id: config.script_id().to_string(),
    })?;

    let parsed: Value =
        serde_json::from_str(body).map_err(|e| ExtractionError::ParseFailed {
            message: e.to_string(),
        })?;

    let record = resolve_path(&parsed, config.record_path()).ok_or_else(|| {
        ExtractionError::RecordNotFound {
            field: config.record_name().to_string(),
        }
    })?;

    tracing::debug!(
        "Extracted record at {} from {} script",
        config.record_path().join("."),
        config.script_id()
    );

    Ok(record.clone())
}
