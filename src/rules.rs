//! Static acceptance rules, one [`RuleSet`] per supported file format.
//!
//! The registry is read-only and shared across all runs. Formats form a
//! closed tagged set resolved through an exhaustive match, so adding a
//! format is a compile-checked extension point rather than an open-ended
//! lookup.

use crate::error::{PipelineError, PipelineResult};

const MIB: u64 = 1024 * 1024;

/// Supported upload formats, resolved from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text (`.csv`).
    DelimitedText,
    /// Spreadsheet/workbook formats (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).
    Spreadsheet,
    /// JSON documents (`.json`).
    Json,
    /// Columnar tables (`.parquet`, `.pq`).
    Columnar,
    /// Plain text (`.txt`).
    PlainText,
    /// Anything else. No validator runs; the upload is rejected.
    Unsupported,
}

impl FileFormat {
    /// Resolve a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Self::DelimitedText,
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Self::Spreadsheet,
            "json" => Self::Json,
            "parquet" | "pq" => Self::Columnar,
            "txt" => Self::PlainText,
            _ => Self::Unsupported,
        }
    }
}

/// Per-format acceptance limits.
///
/// Loaded once as statics below; fields not applicable to a format are
/// `None` (or an empty encoding list for binary formats).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Ceiling on data rows (total rows across sheets for workbooks).
    pub max_rows: Option<u64>,
    /// Ceiling on columns (checked per sheet for workbooks).
    pub max_columns: Option<usize>,
    /// Ceiling on sheet count, workbooks only.
    pub max_sheets: Option<usize>,
    /// Ceiling on raw byte size, checked before any decode.
    pub max_size_bytes: Option<u64>,
    /// Accepted text encodings, tried in order.
    pub encodings: &'static [&'static str],
}

pub(crate) static DELIMITED_TEXT_RULES: RuleSet = RuleSet {
    max_rows: Some(10_000_000),
    max_columns: Some(500),
    max_sheets: None,
    max_size_bytes: None,
    encodings: &["utf-8", "latin-1", "iso-8859-1"],
};

pub(crate) static SPREADSHEET_RULES: RuleSet = RuleSet {
    max_rows: Some(1_048_576),
    max_columns: Some(500),
    max_sheets: Some(50),
    max_size_bytes: None,
    encodings: &[],
};

pub(crate) static JSON_RULES: RuleSet = RuleSet {
    max_rows: None,
    max_columns: None,
    max_sheets: None,
    max_size_bytes: Some(200 * MIB),
    encodings: &["utf-8", "latin-1"],
};

pub(crate) static COLUMNAR_RULES: RuleSet = RuleSet {
    max_rows: None,
    max_columns: None,
    max_sheets: None,
    max_size_bytes: Some(500 * MIB),
    encodings: &[],
};

pub(crate) static PLAIN_TEXT_RULES: RuleSet = RuleSet {
    max_rows: None,
    max_columns: None,
    max_sheets: None,
    max_size_bytes: Some(100 * MIB),
    encodings: &["utf-8", "latin-1"],
};

/// Look up the acceptance rules for a format.
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedFormat`] for
/// [`FileFormat::Unsupported`].
pub fn lookup(format: FileFormat) -> PipelineResult<&'static RuleSet> {
    match format {
        FileFormat::DelimitedText => Ok(&DELIMITED_TEXT_RULES),
        FileFormat::Spreadsheet => Ok(&SPREADSHEET_RULES),
        FileFormat::Json => Ok(&JSON_RULES),
        FileFormat::Columnar => Ok(&COLUMNAR_RULES),
        FileFormat::PlainText => Ok(&PLAIN_TEXT_RULES),
        FileFormat::Unsupported => Err(PipelineError::UnsupportedFormat),
    }
}
