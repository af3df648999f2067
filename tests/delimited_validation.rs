use upload_triage::report::{ObjectIdentity, ValidationReport};
use upload_triage::rules::{self, FileFormat, RuleSet};
use upload_triage::validators::delimited;

fn report_for(blob_name: &str, size: usize) -> ValidationReport {
    let identity = ObjectIdentity::parse(blob_name, "uploads");
    ValidationReport::new(&identity, size as u64)
}

fn default_rules() -> &'static RuleSet {
    rules::lookup(FileFormat::DelimitedText).unwrap()
}

#[test]
fn minimal_well_formed_csv_is_valid() {
    let bytes = b"id,name\n1,Ada\n2,Grace\n";
    let mut report = report_for("uploads/acme/data.csv", bytes.len());

    let table = delimited::validate(bytes, default_rules(), &mut report).unwrap();

    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(table.row_count(), 2);
    assert_eq!(report.metadata["rows"], 2);
    assert_eq!(report.metadata["columns"], 2);
    assert_eq!(report.metadata["column_names"], serde_json::json!(["id", "name"]));
    assert_eq!(report.metadata["encoding"], "utf-8");
    assert_eq!(report.metadata["null_percentage"], 0.0);
}

#[test]
fn duplicate_column_warns_but_still_completes() {
    let bytes = b"a,a,b\n1,2,3\n";
    let mut report = report_for("uploads/acme/dup.csv", bytes.len());

    delimited::validate(bytes, default_rules(), &mut report).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("duplicate column names"));
    assert!(report.warnings[0].contains('a'));
    assert_eq!(report.metadata["rows"], 1);
    assert_eq!(report.metadata["columns"], 3);
}

#[test]
fn single_row_ceiling_violation_yields_one_error() {
    let rules = RuleSet {
        max_rows: Some(2),
        max_columns: Some(10),
        max_sheets: None,
        max_size_bytes: None,
        encodings: &["utf-8"],
    };
    let bytes = b"id\n1\n2\n3\n";
    let mut report = report_for("uploads/acme/long.csv", bytes.len());

    delimited::validate(bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("2 rows"));
    assert!(report.errors[0].contains("3 found"));
    // Metadata is still computed for a soft-limit violation.
    assert_eq!(report.metadata["rows"], 3);
}

#[test]
fn row_and_column_ceilings_are_checked_independently() {
    let rules = RuleSet {
        max_rows: Some(1),
        max_columns: Some(2),
        max_sheets: None,
        max_size_bytes: None,
        encodings: &["utf-8"],
    };
    let bytes = b"a,b,c\n1,2,3\n4,5,6\n";
    let mut report = report_for("uploads/acme/wide.csv", bytes.len());

    delimited::validate(bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|e| e.contains("rows")));
    assert!(report.errors.iter().any(|e| e.contains("columns")));
}

#[test]
fn latin1_only_file_is_accepted_with_fallback_encoding() {
    // 0xE9 is `é` in latin-1 and invalid as a UTF-8 start byte.
    let bytes = b"id,caf\xe9\n1,ol\xe9\n";
    let mut report = report_for("uploads/acme/latin.csv", bytes.len());

    let table = delimited::validate(bytes, default_rules(), &mut report).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.metadata["encoding"], "latin-1");
    assert_eq!(table.columns, vec!["id", "caf\u{e9}"]);
}

#[test]
fn fully_empty_rows_produce_a_warning_and_count_as_nulls() {
    let bytes = b"a,b\n1,2\n,\n";
    let mut report = report_for("uploads/acme/gaps.csv", bytes.len());

    delimited::validate(bytes, default_rules(), &mut report).unwrap();

    assert!(report.errors.is_empty());
    assert!(report.warnings.iter().any(|w| w.contains("1 fully empty rows")));
    assert_eq!(report.metadata["null_percentage"], 50.0);
}

#[test]
fn unparseable_input_is_a_single_fatal_error_with_no_metadata() {
    // Ragged records fail the bounded probe for every accepted encoding.
    let bytes = b"a,b\n1\n2,3,4\n";
    let mut report = report_for("uploads/acme/ragged.csv", bytes.len());

    let table = delimited::validate(bytes, default_rules(), &mut report);

    assert!(table.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("could not parse delimited file"));
    assert!(report.metadata.is_empty());
}
