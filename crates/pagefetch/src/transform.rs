//! The transformer: extraction, field filtering, and output shaping.

use serde_json::{Map, Value};

use crate::extract::{extract_record, ExtractorConfig};
use crate::types::{
    CompactRecord, OutputFormat, Passthrough, RawInput, TransformRequest, TransformResult,
};

/// Maximum number of `regionPriceRankContent` entries kept in compact output.
pub const COMPACT_RANK_LIMIT: usize = 15;

/// Transform `raw` into its final output shape.
///
/// JSON input, and text without the configured marker, is wrapped unchanged.
/// Extraction failures come back as [`TransformResult::Failed`].
pub fn transform(
    raw: &RawInput,
    format: OutputFormat,
    filter_fields: Option<&[String]>,
    config: &ExtractorConfig,
) -> TransformResult {
    let html = match raw.as_text() {
        Some(text) if config.has_marker(text) => text,
        _ => {
            return TransformResult::Passthrough(Passthrough {
                processed: true,
                data: raw.clone(),
                format,
                filter_fields: filter_fields.map(<[String]>::to_vec),
            })
        }
    };

    let record = match extract_record(html, config) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("Extraction failed: {}", e.error());
            return TransformResult::Failed(e);
        }
    };

    let record = match filter_fields {
        Some(fields) if !fields.is_empty() => filter_record(&record, fields),
        _ => record,
    };

    match format {
        OutputFormat::Compact => TransformResult::Compact(compact(&record)),
        OutputFormat::Detailed => TransformResult::Record(record),
    }
}

/// Convenience wrapper over [`transform`] for an owned request.
pub fn apply(request: &TransformRequest, config: &ExtractorConfig) -> TransformResult {
    transform(
        &request.data,
        request.format,
        request.filter_fields.as_deref(),
        config,
    )
}

/// Keep only `fields` that exist in `record`, in the order they were requested.
pub fn filter_record(record: &Value, fields: &[String]) -> Value {
    let mut filtered = Map::new();
    if let Some(obj) = record.as_object() {
        for field in fields {
            if filtered.contains_key(field) {
                continue;
            }
            if let Some(value) = obj.get(field) {
                filtered.insert(field.clone(), value.clone());
            }
        }
    }
    Value::Object(filtered)
}

/// Project a record into the four-field summary view.
pub fn compact(record: &Value) -> CompactRecord {
    let field = |name: &str| record.get(name).cloned();

    let region_price_rank_content = record
        .get("regionPriceRankContent")
        .and_then(Value::as_array)
        .map(|items| items.iter().take(COMPACT_RANK_LIMIT).cloned().collect())
        .unwrap_or_default();

    CompactRecord {
        title: field("title"),
        sub_title: field("subTitle"),
        region_name: field("regionName"),
        region_price_rank_content,
    }
}
