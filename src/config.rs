//! Pipeline configuration.

use std::env;

/// Names of the storage areas the pipeline works against.
///
/// Environment overrides follow the `UPLOAD_TRIAGE_*` convention with the
/// defaults below as fallback.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Container watched by the trigger mechanism.
    pub source_container: String,
    /// Destination for accepted objects.
    pub staging_container: String,
    /// Destination for rejected objects.
    pub rejected_container: String,
    /// Container holding the persisted validation reports.
    pub notifications_container: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_container: "uploads".to_string(),
            staging_container: "staging".to_string(),
            rejected_container: "rejected".to_string(),
            notifications_container: "notifications".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load the configuration from environment variables, falling back to
    /// the defaults for any variable that is unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            source_container: env::var("UPLOAD_TRIAGE_SOURCE_CONTAINER")
                .unwrap_or(defaults.source_container),
            staging_container: env::var("UPLOAD_TRIAGE_STAGING_CONTAINER")
                .unwrap_or(defaults.staging_container),
            rejected_container: env::var("UPLOAD_TRIAGE_REJECTED_CONTAINER")
                .unwrap_or(defaults.rejected_container),
            notifications_container: env::var("UPLOAD_TRIAGE_NOTIFICATIONS_CONTAINER")
                .unwrap_or(defaults.notifications_container),
        }
    }
}
