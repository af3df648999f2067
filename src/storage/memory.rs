//! In-process object store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ObjectLocation, ObjectStore, StorageError, StorageResult, Tags};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    tags: Tags,
}

/// Object store held entirely in memory.
///
/// Used by the test suite and by embedders that want the pipeline without a
/// real blob service. All operations lock one map; fine for the object sizes
/// and run counts this store is meant for.
#[derive(Debug, Default)]
pub struct MemoryStore {
    containers: Mutex<HashMap<String, HashMap<String, StoredObject>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if an object exists at `location`.
    pub fn contains(&self, location: &ObjectLocation) -> bool {
        let containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers
            .get(&location.container)
            .is_some_and(|objects| objects.contains_key(&location.key))
    }

    /// Tags of the object at `location`, if present.
    pub fn tags_of(&self, location: &ObjectLocation) -> Option<Tags> {
        let containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers
            .get(&location.container)
            .and_then(|objects| objects.get(&location.key))
            .map(|obj| obj.tags.clone())
    }

    /// Keys currently stored in `container`, sorted.
    pub fn keys_in(&self, container: &str) -> Vec<String> {
        let containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = containers
            .get(container)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl ObjectStore for MemoryStore {
    fn create_container(&self, container: &str) -> StorageResult<()> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers.entry(container.to_string()).or_default();
        Ok(())
    }

    fn get(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>> {
        let containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        containers
            .get(&location.container)
            .ok_or_else(|| StorageError::ContainerNotFound(location.container.clone()))?
            .get(&location.key)
            .map(|obj| obj.bytes.clone())
            .ok_or_else(|| StorageError::ObjectNotFound {
                container: location.container.clone(),
                key: location.key.clone(),
            })
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8], tags: &Tags) -> StorageResult<()> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let objects = containers
            .get_mut(&location.container)
            .ok_or_else(|| StorageError::ContainerNotFound(location.container.clone()))?;
        objects.insert(
            location.key.clone(),
            StoredObject {
                bytes: bytes.to_vec(),
                tags: tags.clone(),
            },
        );
        Ok(())
    }

    fn delete(&self, location: &ObjectLocation) -> StorageResult<()> {
        let mut containers = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        let objects = containers
            .get_mut(&location.container)
            .ok_or_else(|| StorageError::ContainerNotFound(location.container.clone()))?;
        objects
            .remove(&location.key)
            .map(|_| ())
            .ok_or_else(|| StorageError::ObjectNotFound {
                container: location.container.clone(),
                key: location.key.clone(),
            })
    }
}
