//! Delimited-text validation.

use std::collections::HashSet;

use serde_json::json;

use crate::report::{round2, ValidationReport};
use crate::rules::RuleSet;
use crate::table::{Cell, Table};

use super::decode_text;

/// Records read during the per-encoding probe before committing to a full
/// parse.
const PROBE_RECORDS: usize = 5;
const MAX_REPORTED_COLUMNS: usize = 50;
const MAX_REPORTED_DUPLICATES: usize = 5;

/// Validate a delimited-text upload.
///
/// Encodings are tried in the configured order with a cheap bounded parse;
/// the first one that parses cleanly is used for the full-file parse. Row
/// and column ceilings are checked independently so one violation never
/// hides the other.
pub fn validate(bytes: &[u8], rules: &RuleSet, report: &mut ValidationReport) -> Option<Table> {
    let Some((encoding, text)) = detect_encoding(bytes, rules.encodings) else {
        report.errors.push(format!(
            "could not parse delimited file with any accepted encoding ({})",
            rules.encodings.join(", ")
        ));
        return None;
    };

    let table = match parse_table(&text) {
        Ok(table) => table,
        Err(err) => {
            report
                .errors
                .push(format!("failed to parse delimited file: {err}"));
            return None;
        }
    };

    let rows = table.row_count() as u64;
    let columns = table.column_count();
    if let Some(max_rows) = rules.max_rows {
        if rows > max_rows {
            report.errors.push(format!(
                "delimited file exceeds the limit of {max_rows} rows ({rows} found)"
            ));
        }
    }
    if let Some(max_columns) = rules.max_columns {
        if columns > max_columns {
            report.errors.push(format!(
                "delimited file exceeds the limit of {max_columns} columns ({columns} found)"
            ));
        }
    }

    let duplicates = duplicate_columns(&table.columns);
    if !duplicates.is_empty() {
        let shown: Vec<&str> = duplicates
            .iter()
            .take(MAX_REPORTED_DUPLICATES)
            .map(String::as_str)
            .collect();
        report
            .warnings
            .push(format!("duplicate column names found: {shown:?}"));
    }

    let empty_rows = table.empty_row_count();
    if empty_rows > 0 {
        report
            .warnings
            .push(format!("{empty_rows} fully empty rows found"));
    }

    let column_names: Vec<&str> = table
        .columns
        .iter()
        .take(MAX_REPORTED_COLUMNS)
        .map(String::as_str)
        .collect();
    report.metadata.insert("encoding".to_string(), json!(encoding));
    report.metadata.insert("rows".to_string(), json!(rows));
    report.metadata.insert("columns".to_string(), json!(columns));
    report
        .metadata
        .insert("column_names".to_string(), json!(column_names));
    report.metadata.insert(
        "null_percentage".to_string(),
        json!(round2(table.null_fraction() * 100.0)),
    );

    Some(table)
}

/// Try each accepted encoding in order; adopt the first whose decoded text
/// survives a bounded parse of the header plus a few records.
fn detect_encoding(bytes: &[u8], encodings: &[&'static str]) -> Option<(&'static str, String)> {
    for &label in encodings {
        let Some((used, text)) = decode_text(bytes, &[label]) else {
            continue;
        };
        if probe(&text).is_ok() {
            return Some((used, text));
        }
    }
    None
}

fn probe(text: &str) -> Result<(), csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    rdr.headers()?;
    for record in rdr.records().take(PROBE_RECORDS) {
        record?;
    }
    Ok(())
}

fn parse_table(text: &str) -> Result<Table, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|raw| {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        Cell::Null
                    } else {
                        Cell::Text(trimmed.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Table::new(columns, rows))
}

/// Column names that occur more than once, each listed once in first-seen
/// order.
fn duplicate_columns(columns: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for name in columns {
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::duplicate_columns;

    #[test]
    fn duplicates_listed_once_in_order() {
        let columns = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ];
        assert_eq!(duplicate_columns(&columns), vec!["a", "b"]);
    }
}
