use thiserror::Error;

use crate::storage::StorageError;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by the orchestrator and the storage-facing components.
///
/// Rule violations discovered by the format validators are *not* represented
/// here: they are accumulated as entries on the run's
/// [`crate::report::ValidationReport`] and drive rejection instead of being
/// raised.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Object store operation failed (get/put/delete/container creation).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The validation report could not be serialized for persistence.
    #[error("report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The extension does not map to any format in the closed supported set.
    #[error("unsupported format")]
    UnsupportedFormat,
}
