use rust_xlsxwriter::Workbook;

use upload_triage::report::{ObjectIdentity, ValidationReport};
use upload_triage::rules::{self, FileFormat, RuleSet};
use upload_triage::validators::spreadsheet;

fn report_for(blob_name: &str, size: usize) -> ValidationReport {
    let identity = ObjectIdentity::parse(blob_name, "uploads");
    ValidationReport::new(&identity, size as u64)
}

fn default_rules() -> &'static RuleSet {
    rules::lookup(FileFormat::Spreadsheet).unwrap()
}

/// One sheet named `name` with a 3-column header and `data_rows` data rows.
fn add_people_sheet(wb: &mut Workbook, name: &str, data_rows: u32) {
    let ws = wb.add_worksheet();
    ws.set_name(name).unwrap();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "score").unwrap();
    for row in 1..=data_rows {
        ws.write_number(row, 0, row).unwrap();
        ws.write_string(row, 1, "Ada").unwrap();
        ws.write_number(row, 2, 98.5).unwrap();
    }
}

fn single_sheet_bytes(data_rows: u32) -> Vec<u8> {
    let mut wb = Workbook::new();
    add_people_sheet(&mut wb, "Sheet1", data_rows);
    wb.save_to_buffer().unwrap()
}

#[test]
fn minimal_well_formed_workbook_is_valid() {
    let bytes = single_sheet_bytes(2);
    let mut report = report_for("uploads/acme/book.xlsx", bytes.len());

    spreadsheet::validate(&bytes, default_rules(), &mut report);

    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.metadata["sheet_count"], 1);
    assert_eq!(report.metadata["sheet_names"], serde_json::json!(["Sheet1"]));
    assert_eq!(report.metadata["total_rows"], 2);

    let detail = &report.metadata["sheets_detail"]["Sheet1"];
    assert_eq!(detail["rows"], 2);
    assert_eq!(detail["columns"], 3);
    assert_eq!(detail["column_names"], serde_json::json!(["id", "name", "score"]));
}

#[test]
fn sheet_ceiling_violation_aborts_before_reading_any_sheet() {
    let mut wb = Workbook::new();
    add_people_sheet(&mut wb, "One", 1);
    add_people_sheet(&mut wb, "Two", 1);
    let bytes = wb.save_to_buffer().unwrap();

    let rules = RuleSet {
        max_rows: Some(100),
        max_columns: Some(100),
        max_sheets: Some(1),
        max_size_bytes: None,
        encodings: &[],
    };
    let mut report = report_for("uploads/acme/tabs.xlsx", bytes.len());

    spreadsheet::validate(&bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("1 sheets"));
    assert!(report.errors[0].contains("2 found"));
    assert!(report.metadata.is_empty());
}

#[test]
fn column_ceiling_is_checked_per_sheet_and_accumulates() {
    let mut wb = Workbook::new();
    add_people_sheet(&mut wb, "One", 1);
    add_people_sheet(&mut wb, "Two", 1);
    let bytes = wb.save_to_buffer().unwrap();

    let rules = RuleSet {
        max_rows: Some(100),
        max_columns: Some(2),
        max_sheets: Some(10),
        max_size_bytes: None,
        encodings: &[],
    };
    let mut report = report_for("uploads/acme/wide.xlsx", bytes.len());

    spreadsheet::validate(&bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].contains("'One'"));
    assert!(report.errors[1].contains("'Two'"));
}

#[test]
fn total_row_ceiling_is_checked_across_sheets() {
    let mut wb = Workbook::new();
    add_people_sheet(&mut wb, "One", 2);
    add_people_sheet(&mut wb, "Two", 2);
    let bytes = wb.save_to_buffer().unwrap();

    let rules = RuleSet {
        max_rows: Some(3),
        max_columns: Some(100),
        max_sheets: Some(10),
        max_size_bytes: None,
        encodings: &[],
    };
    let mut report = report_for("uploads/acme/tall.xlsx", bytes.len());

    spreadsheet::validate(&bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("total row count (4)"));
    assert_eq!(report.metadata["total_rows"], 4);
}

#[test]
fn unreadable_workbook_is_a_single_fatal_error() {
    let bytes = b"this is not a workbook";
    let mut report = report_for("uploads/acme/bad.xlsx", bytes.len());

    spreadsheet::validate(bytes, default_rules(), &mut report);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("corrupt or unreadable workbook"));
    assert!(report.metadata.is_empty());
}
