//! Columnar-table validation.
//!
//! Uses the Parquet record API: the footer supplies column names and
//! declared types, and a full row decode both counts rows and surfaces
//! corrupt data pages.

use bytes::Bytes;
use parquet::basic::ConvertedType;
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;
use serde_json::json;

use crate::report::ValidationReport;
use crate::rules::RuleSet;
use crate::table::{Cell, Table};

use super::exceeds_size_limit;

const MAX_REPORTED_COLUMNS: usize = 50;

/// Validate a columnar upload.
///
/// The byte-size ceiling is checked before any decode; any structural decode
/// failure is a single fatal error and leaves no partial metadata behind.
pub fn validate(bytes: &[u8], rules: &RuleSet, report: &mut ValidationReport) -> Option<Table> {
    if exceeds_size_limit(bytes.len(), rules, "columnar", report) {
        return None;
    }

    let reader = match SerializedFileReader::new(Bytes::copy_from_slice(bytes)) {
        Ok(reader) => reader,
        Err(err) => {
            report
                .errors
                .push(format!("invalid or corrupt columnar file: {err}"));
            return None;
        }
    };

    let mut columns: Vec<String> = Vec::new();
    let mut column_types = serde_json::Map::new();
    for descr in reader.metadata().file_metadata().schema_descr().columns() {
        let name = descr.path().string();
        let declared = match descr.converted_type() {
            ConvertedType::NONE => descr.physical_type().to_string(),
            converted => converted.to_string(),
        };
        column_types.insert(name.clone(), json!(declared));
        columns.push(name);
    }

    let row_iter = match reader.get_row_iter(None) {
        Ok(row_iter) => row_iter,
        Err(err) => {
            report
                .errors
                .push(format!("invalid or corrupt columnar file: {err}"));
            return None;
        }
    };

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for row_result in row_iter {
        let row = match row_result {
            Ok(row) => row,
            Err(err) => {
                report
                    .errors
                    .push(format!("invalid or corrupt columnar file: {err}"));
                return None;
            }
        };
        rows.push(
            row.get_column_iter()
                .map(|(_, field)| convert_field(field))
                .collect(),
        );
    }

    let table = Table::new(columns, rows);
    let column_names: Vec<&str> = table
        .columns
        .iter()
        .take(MAX_REPORTED_COLUMNS)
        .map(String::as_str)
        .collect();
    report
        .metadata
        .insert("rows".to_string(), json!(table.row_count()));
    report
        .metadata
        .insert("columns".to_string(), json!(table.column_count()));
    report
        .metadata
        .insert("column_names".to_string(), json!(column_names));
    report.metadata.insert(
        "column_types".to_string(),
        serde_json::Value::Object(column_types),
    );

    Some(table)
}

fn convert_field(field: &Field) -> Cell {
    match field {
        Field::Null => Cell::Null,
        Field::Bool(b) => Cell::Bool(*b),
        Field::Byte(v) => Cell::Int64(i64::from(*v)),
        Field::Short(v) => Cell::Int64(i64::from(*v)),
        Field::Int(v) => Cell::Int64(i64::from(*v)),
        Field::Long(v) => Cell::Int64(*v),
        Field::UByte(v) => Cell::Int64(i64::from(*v)),
        Field::UShort(v) => Cell::Int64(i64::from(*v)),
        Field::UInt(v) => Cell::Int64(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(v) => Cell::Int64(v),
            Err(_) => Cell::Text(v.to_string()),
        },
        Field::Float(v) => Cell::Float64(f64::from(*v)),
        Field::Double(v) => Cell::Float64(*v),
        Field::Str(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}
