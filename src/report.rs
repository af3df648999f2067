//! The per-object validation record and the identity parsed from a blob name.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity of an uploaded object, extracted from its blob name.
///
/// Blob names follow `{source}/{client}/{yyyy}/{mm}/{dd}/{filename}`; only
/// the first segment after the source container (the client) and the last
/// segment (the filename) are significant. Objects uploaded without a path
/// hierarchy have no client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentity {
    /// Full blob name as delivered by the trigger.
    pub blob_name: String,
    /// Key relative to the source container; reused for the triage destination.
    pub key: String,
    /// Client identifier, when the blob name carries one.
    pub client: Option<String>,
    /// Final path segment.
    pub filename: String,
    /// Lowercased extension, empty when the filename has no dot.
    pub extension: String,
}

impl ObjectIdentity {
    /// Parse an identity out of a blob name.
    pub fn parse(blob_name: &str, source_container: &str) -> Self {
        let prefix = format!("{source_container}/");
        let key = blob_name.strip_prefix(&prefix).unwrap_or(blob_name);

        let parts: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        let filename = parts.last().copied().unwrap_or(key).to_string();
        let client = if parts.len() > 1 {
            Some(parts[0].to_string())
        } else {
            None
        };
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            blob_name: blob_name.to_string(),
            key: key.to_string(),
            client,
            filename,
            extension,
        }
    }
}

/// The structured outcome record for one processing run.
///
/// Created at the start of a run, mutated only by that run's validator and
/// triage steps, then persisted once as an immutable artifact. The persisted
/// field set is a stable contract.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Full blob name of the processed object.
    pub blob_name: String,
    /// Client identifier, `None` when unknown.
    pub client: Option<String>,
    /// Filename of the processed object.
    pub filename: String,
    /// Lowercased extension.
    pub extension: String,
    /// Raw size in bytes.
    pub size_bytes: u64,
    /// Raw size in mebibytes, rounded to two decimals.
    pub size_mb: f64,
    /// Time the run started.
    pub timestamp: DateTime<Utc>,
    /// True iff `errors` is empty. Derived by the orchestrator, never by hand.
    pub valid: bool,
    /// Rule violations, in discovery order. Non-empty means rejected.
    pub errors: Vec<String>,
    /// Non-fatal findings, in discovery order. Never affect the outcome.
    pub warnings: Vec<String>,
    /// Format-specific counts, names and encodings. May be partial on failure.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ValidationReport {
    /// Create the report shell for one run. `valid` starts `false` and is
    /// derived from `errors` once validation finishes.
    pub fn new(identity: &ObjectIdentity, size_bytes: u64) -> Self {
        Self {
            blob_name: identity.blob_name.clone(),
            client: identity.client.clone(),
            filename: identity.filename.clone(),
            extension: identity.extension.clone(),
            size_bytes,
            size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
            timestamp: Utc::now(),
            valid: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }

    /// True iff no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Round to two decimal places, matching the precision of persisted
/// percentage and size fields.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{round2, ObjectIdentity, ValidationReport};

    #[test]
    fn parses_full_blob_path() {
        let id = ObjectIdentity::parse("uploads/acme/2026/08/07/data.csv", "uploads");
        assert_eq!(id.key, "acme/2026/08/07/data.csv");
        assert_eq!(id.client.as_deref(), Some("acme"));
        assert_eq!(id.filename, "data.csv");
        assert_eq!(id.extension, "csv");
    }

    #[test]
    fn bare_filename_has_no_client() {
        let id = ObjectIdentity::parse("uploads/data.TXT", "uploads");
        assert_eq!(id.key, "data.TXT");
        assert_eq!(id.client, None);
        assert_eq!(id.extension, "txt");
    }

    #[test]
    fn missing_extension_is_empty() {
        let id = ObjectIdentity::parse("uploads/acme/README", "uploads");
        assert_eq!(id.extension, "");
        assert_eq!(id.filename, "README");
    }

    #[test]
    fn size_mb_is_rounded() {
        let id = ObjectIdentity::parse("uploads/a/b.csv", "uploads");
        let report = ValidationReport::new(&id, 1_572_864); // 1.5 MiB
        assert_eq!(report.size_mb, 1.5);
        assert!(!report.valid);
        assert!(report.is_valid()); // no errors yet
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.238), 1.24);
        assert_eq!(round2(33.333), 33.33);
    }
}
