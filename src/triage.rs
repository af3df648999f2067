//! Destination decision and relocation of validated objects.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::report::ValidationReport;
use crate::storage::{ObjectLocation, ObjectStore, StorageResult, Tags};

/// Moves each processed object into its terminal storage area.
///
/// The move is a two-step copy-then-delete and is explicitly non-atomic: a
/// delete failure after a successful copy leaves the object duplicated in
/// the source area, which is an accepted transient state. A copy failure
/// leaves the source untouched and propagates.
pub struct TriageEngine {
    store: Arc<dyn ObjectStore>,
    staging_container: String,
    rejected_container: String,
}

impl TriageEngine {
    /// Create an engine using the store handle owned by the orchestrator.
    pub fn new(store: Arc<dyn ObjectStore>, config: &PipelineConfig) -> Self {
        Self {
            store,
            staging_container: config.staging_container.clone(),
            rejected_container: config.rejected_container.clone(),
        }
    }

    /// Copy `bytes` to the outcome area derived from `report`, tag the copy,
    /// then delete the source object.
    ///
    /// # Errors
    ///
    /// Fails when the destination container cannot be created or the copy
    /// itself fails. A source delete failure is logged, not returned.
    pub fn relocate(
        &self,
        bytes: &[u8],
        source: &ObjectLocation,
        report: &ValidationReport,
    ) -> StorageResult<ObjectLocation> {
        let accepted = report.errors.is_empty();
        let container = if accepted {
            &self.staging_container
        } else {
            &self.rejected_container
        };
        let destination = ObjectLocation::new(container.clone(), source.key.clone());

        self.store.create_container(container)?;

        let mut tags = Tags::new();
        tags.insert(
            "validation_status".to_string(),
            if accepted { "valid" } else { "rejected" }.to_string(),
        );
        tags.insert("validated_at".to_string(), Utc::now().to_rfc3339());
        tags.insert("original_path".to_string(), source.to_string());
        self.store.put(&destination, bytes, &tags)?;

        if let Err(err) = self.store.delete(source) {
            warn!(
                "failed to delete source {} after copy to {}: {}",
                source, destination, err
            );
        } else {
            debug!("moved {} to {}", source, destination);
        }

        Ok(destination)
    }
}
