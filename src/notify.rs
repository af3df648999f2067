//! Persistence of the validation report as an audit artifact.

use std::sync::Arc;

use tracing::debug;

use crate::error::PipelineResult;
use crate::report::ValidationReport;
use crate::storage::{ObjectLocation, ObjectStore, Tags};

/// Serializes the finished report and writes it to the notifications
/// container, once per run regardless of outcome.
pub struct NotificationEmitter {
    store: Arc<dyn ObjectStore>,
    container: String,
}

impl NotificationEmitter {
    /// Create an emitter using the store handle owned by the orchestrator.
    pub fn new(store: Arc<dyn ObjectStore>, container: String) -> Self {
        Self { store, container }
    }

    /// Persist `report` as pretty-printed JSON.
    ///
    /// The artifact path is derived from the client (or a placeholder), the
    /// run date and the filename, so a repeated run for the same name on the
    /// same day overwrites the prior artifact.
    ///
    /// # Errors
    ///
    /// Fails when the report cannot be serialized or the store write fails.
    pub fn emit(&self, report: &ValidationReport) -> PipelineResult<ObjectLocation> {
        self.store.create_container(&self.container)?;

        let location = ObjectLocation::new(self.container.clone(), report_key(report));
        let body = serde_json::to_vec_pretty(report)?;
        self.store.put(&location, &body, &Tags::new())?;
        debug!("validation report stored at {}", location);
        Ok(location)
    }
}

fn report_key(report: &ValidationReport) -> String {
    format!(
        "{}/{}/{}_report.json",
        report.client.as_deref().unwrap_or("unknown"),
        report.timestamp.format("%Y/%m/%d"),
        report.filename
    )
}

#[cfg(test)]
mod tests {
    use super::report_key;
    use crate::report::{ObjectIdentity, ValidationReport};

    #[test]
    fn report_key_uses_client_date_and_filename() {
        let id = ObjectIdentity::parse("uploads/acme/2026/08/07/data.csv", "uploads");
        let report = ValidationReport::new(&id, 10);
        let key = report_key(&report);
        assert!(key.starts_with("acme/"));
        assert!(key.ends_with("/data.csv_report.json"));
    }

    #[test]
    fn report_key_falls_back_to_placeholder_client() {
        let id = ObjectIdentity::parse("uploads/data.csv", "uploads");
        let report = ValidationReport::new(&id, 10);
        assert!(report_key(&report).starts_with("unknown/"));
    }
}
