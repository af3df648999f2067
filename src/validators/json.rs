//! JSON validation.

use serde_json::json;

use crate::report::ValidationReport;
use crate::rules::RuleSet;

use super::{decode_text, exceeds_size_limit};

const MAX_REPORTED_KEYS: usize = 20;

/// Validate a JSON upload.
///
/// The byte-size ceiling is checked before any decode. Decoding tries UTF-8
/// first and falls back to the alternate accepted encoding; a payload that
/// decodes but does not parse as JSON is fatal. Any well-formed top-level
/// value is accepted; only arrays and objects contribute structural
/// metadata.
pub fn validate(bytes: &[u8], rules: &RuleSet, report: &mut ValidationReport) {
    if exceeds_size_limit(bytes.len(), rules, "json", report) {
        return;
    }

    let Some((_, text)) = decode_text(bytes, rules.encodings) else {
        report
            .errors
            .push("unsupported text encoding".to_string());
        return;
    };

    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            report.errors.push(format!("invalid json: {err}"));
            return;
        }
    };

    match value {
        serde_json::Value::Array(items) => {
            let sample_keys: Vec<&String> = items
                .first()
                .and_then(|item| item.as_object())
                .map(|obj| obj.keys().take(MAX_REPORTED_KEYS).collect())
                .unwrap_or_default();
            report.metadata.insert("type".to_string(), json!("array"));
            report
                .metadata
                .insert("record_count".to_string(), json!(items.len()));
            report
                .metadata
                .insert("sample_keys".to_string(), json!(sample_keys));
        }
        serde_json::Value::Object(map) => {
            let top_level_keys: Vec<&String> = map.keys().take(MAX_REPORTED_KEYS).collect();
            report.metadata.insert("type".to_string(), json!("object"));
            report
                .metadata
                .insert("top_level_keys".to_string(), json!(top_level_keys));
        }
        // Scalar top-level values are accepted with no structural metadata.
        _ => {}
    }
}
