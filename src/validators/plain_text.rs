//! Plain-text validation.

use serde_json::json;

use crate::report::ValidationReport;
use crate::rules::RuleSet;

use super::{decode_text, exceeds_size_limit};

/// Validate a plain-text upload.
pub fn validate(bytes: &[u8], rules: &RuleSet, report: &mut ValidationReport) {
    if exceeds_size_limit(bytes.len(), rules, "text", report) {
        return;
    }

    let Some((encoding, text)) = decode_text(bytes, rules.encodings) else {
        report
            .errors
            .push("unsupported text encoding".to_string());
        return;
    };

    let lines = text.matches('\n').count() + 1;
    report.metadata.insert("lines".to_string(), json!(lines));
    report
        .metadata
        .insert("characters".to_string(), json!(text.chars().count()));
    report
        .metadata
        .insert("encoding".to_string(), json!(encoding));
}
