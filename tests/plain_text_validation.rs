use upload_triage::report::{ObjectIdentity, ValidationReport};
use upload_triage::rules::{self, FileFormat, RuleSet};
use upload_triage::validators::plain_text;

fn report_for(blob_name: &str, size: usize) -> ValidationReport {
    let identity = ObjectIdentity::parse(blob_name, "uploads");
    ValidationReport::new(&identity, size as u64)
}

fn default_rules() -> &'static RuleSet {
    rules::lookup(FileFormat::PlainText).unwrap()
}

#[test]
fn minimal_text_file_counts_lines_and_characters() {
    let bytes = b"hello\nworld";
    let mut report = report_for("uploads/acme/notes.txt", bytes.len());

    plain_text::validate(bytes, default_rules(), &mut report);

    assert!(report.errors.is_empty());
    assert_eq!(report.metadata["lines"], 2);
    assert_eq!(report.metadata["characters"], 11);
    assert_eq!(report.metadata["encoding"], "utf-8");
}

#[test]
fn latin1_payload_falls_back() {
    let bytes = b"ol\xe9\n";
    let mut report = report_for("uploads/acme/latin.txt", bytes.len());

    plain_text::validate(bytes, default_rules(), &mut report);

    assert!(report.errors.is_empty());
    assert_eq!(report.metadata["encoding"], "latin-1");
    assert_eq!(report.metadata["lines"], 2);
    assert_eq!(report.metadata["characters"], 4);
}

#[test]
fn oversized_payload_is_rejected_before_decode() {
    let rules = RuleSet {
        max_rows: None,
        max_columns: None,
        max_sheets: None,
        max_size_bytes: Some(4),
        encodings: &["utf-8", "latin-1"],
    };
    let bytes = b"hello";
    let mut report = report_for("uploads/acme/big.txt", bytes.len());

    plain_text::validate(bytes, &rules, &mut report);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("exceeds the limit"));
    assert!(report.metadata.is_empty());
}
