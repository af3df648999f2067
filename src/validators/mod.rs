//! Format-specific structural validators.
//!
//! Each validator consumes the raw upload bytes plus the matching
//! [`RuleSet`](crate::rules::RuleSet) and writes its findings onto the run's
//! [`ValidationReport`](crate::report::ValidationReport). Every validator
//! accumulates all applicable rule violations instead of stopping at the
//! first one; only structural failures that make further checks meaningless
//! (undecodable input, corrupt container, size ceiling) are fatal.
//!
//! Format-specific implementations live under:
//! - [`delimited`]
//! - [`spreadsheet`]
//! - [`json`]
//! - [`columnar`]
//! - [`plain_text`]

pub mod columnar;
pub mod delimited;
pub mod json;
pub mod plain_text;
pub mod spreadsheet;

use encoding_rs::Encoding;

use crate::report::ValidationReport;
use crate::rules::{FileFormat, RuleSet};
use crate::table::Table;

/// Dispatch to the validator for `format`.
///
/// Returns the parsed table for the flat tabular formats (delimited text and
/// columnar); the remaining formats only produce report entries.
pub fn run(
    format: FileFormat,
    bytes: &[u8],
    rules: &RuleSet,
    report: &mut ValidationReport,
) -> Option<Table> {
    match format {
        FileFormat::DelimitedText => delimited::validate(bytes, rules, report),
        FileFormat::Spreadsheet => {
            spreadsheet::validate(bytes, rules, report);
            None
        }
        FileFormat::Json => {
            json::validate(bytes, rules, report);
            None
        }
        FileFormat::Columnar => columnar::validate(bytes, rules, report),
        FileFormat::PlainText => {
            plain_text::validate(bytes, rules, report);
            None
        }
        // Rule lookup rejects unsupported formats before dispatch.
        FileFormat::Unsupported => None,
    }
}

/// Record a fatal size-ceiling error when `len` exceeds the rule set's byte
/// limit. Returns true when the caller must stop before decoding anything.
pub(crate) fn exceeds_size_limit(
    len: usize,
    rules: &RuleSet,
    label: &str,
    report: &mut ValidationReport,
) -> bool {
    let Some(max) = rules.max_size_bytes else {
        return false;
    };
    if len as u64 <= max {
        return false;
    }
    report.errors.push(format!(
        "{label} file exceeds the limit of {} MB ({:.1} MB)",
        max / (1024 * 1024),
        len as f64 / (1024.0 * 1024.0)
    ));
    true
}

/// Decode `bytes` with the first accepted encoding that decodes cleanly.
///
/// Returns the configured encoding label alongside the decoded text so the
/// report can name the encoding actually used.
pub(crate) fn decode_text(
    bytes: &[u8],
    encodings: &[&'static str],
) -> Option<(&'static str, String)> {
    for &label in encodings {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            continue;
        };
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Some((label, text.into_owned()));
        }
    }
    None
}
