//! Object-store interface consumed by the triage and notification steps.
//!
//! The production blob service is an external collaborator; the pipeline
//! only depends on the [`ObjectStore`] trait. Two implementations ship with
//! the crate:
//!
//! - [`MemoryStore`]: in-process store for tests and embedding
//! - [`FsStore`]: local-disk store for development deployments

mod fs;
mod memory;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub use fs::FsStore;
pub use memory::MemoryStore;

/// Key/value tags attached to a stored object.
pub type Tags = BTreeMap<String, String>;

/// Address of one object: a container plus a hierarchical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    /// Container (bucket) name.
    pub container: String,
    /// Key within the container; may contain `/` separators.
    pub key: String,
}

impl ObjectLocation {
    /// Create a location from container and key.
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

/// Error type shared by all [`ObjectStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("container `{0}` not found")]
    ContainerNotFound(String),
    #[error("object `{key}` not found in container `{container}`")]
    ObjectNotFound { container: String, key: String },
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable binary storage addressed by container + key.
///
/// `put` overwrites an existing object at the same location; `create_container`
/// is idempotent. Implementations must be shareable across parallel runs.
pub trait ObjectStore: Send + Sync {
    /// Create a container if it does not already exist.
    fn create_container(&self, container: &str) -> StorageResult<()>;

    /// Read the full payload of an object.
    fn get(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>>;

    /// Write an object, replacing any existing payload and tags.
    fn put(&self, location: &ObjectLocation, bytes: &[u8], tags: &Tags) -> StorageResult<()>;

    /// Remove an object.
    fn delete(&self, location: &ObjectLocation) -> StorageResult<()>;
}
