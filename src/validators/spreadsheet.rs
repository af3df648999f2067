//! Spreadsheet/workbook validation.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::json;

use crate::report::ValidationReport;
use crate::rules::RuleSet;

const MAX_REPORTED_SHEET_COLUMNS: usize = 20;

/// Validate a workbook upload.
///
/// Behavior:
/// - An unreadable workbook is a single fatal error.
/// - A sheet count above the ceiling is fatal and no sheet is read.
/// - A single unreadable sheet is a warning; the remaining sheets are still
///   counted and checked.
/// - Column ceilings are checked per sheet, so several sheets can each
///   contribute an error; the total row ceiling is checked once at the end.
pub fn validate(bytes: &[u8], rules: &RuleSet, report: &mut ValidationReport) {
    let mut workbook = match open_workbook_auto_from_rs(Cursor::new(bytes)) {
        Ok(workbook) => workbook,
        Err(err) => {
            report
                .errors
                .push(format!("corrupt or unreadable workbook: {err}"));
            return;
        }
    };

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if let Some(max_sheets) = rules.max_sheets {
        if sheet_names.len() > max_sheets {
            report.errors.push(format!(
                "workbook exceeds the limit of {max_sheets} sheets ({} found)",
                sheet_names.len()
            ));
            return;
        }
    }

    let mut total_rows: u64 = 0;
    let mut sheets_detail = serde_json::Map::new();
    for sheet in &sheet_names {
        let range = match workbook.worksheet_range(sheet) {
            Ok(range) => range,
            Err(err) => {
                report
                    .warnings
                    .push(format!("failed to read sheet '{sheet}': {err}"));
                continue;
            }
        };

        // The first non-empty used row is the header; data rows follow it.
        let rows = (range.height().saturating_sub(1)) as u64;
        let columns = range.width();
        total_rows += rows;

        if let Some(max_columns) = rules.max_columns {
            if columns > max_columns {
                report.errors.push(format!(
                    "sheet '{sheet}' exceeds the limit of {max_columns} columns ({columns} found)"
                ));
            }
        }

        let column_names: Vec<String> = range
            .rows()
            .next()
            .map(|header| {
                header
                    .iter()
                    .take(MAX_REPORTED_SHEET_COLUMNS)
                    .map(header_cell_to_string)
                    .collect()
            })
            .unwrap_or_default();
        sheets_detail.insert(
            sheet.clone(),
            json!({
                "rows": rows,
                "columns": columns,
                "column_names": column_names,
            }),
        );
    }

    if let Some(max_rows) = rules.max_rows {
        if total_rows > max_rows {
            report.errors.push(format!(
                "total row count ({total_rows}) exceeds the limit ({max_rows})"
            ));
        }
    }

    report
        .metadata
        .insert("sheet_count".to_string(), json!(sheet_names.len()));
    report
        .metadata
        .insert("sheet_names".to_string(), json!(sheet_names));
    report
        .metadata
        .insert("total_rows".to_string(), json!(total_rows));
    report.metadata.insert(
        "sheets_detail".to_string(),
        serde_json::Value::Object(sheets_detail),
    );
}

fn header_cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
