//! Local-disk object store.
//!
//! Payloads live beneath `base_path/{container}/{key}`. Blob tags have no
//! filesystem equivalent, so they are written to a `{key}.tags.json` sidecar
//! next to the payload; keys ending in `.tags.json` are therefore rejected.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::{ObjectLocation, ObjectStore, StorageError, StorageResult, Tags};

const MAX_OBJECT_KEY_LEN: usize = 1024;
const TAG_SIDECAR_SUFFIX: &str = ".tags.json";

/// Object store backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct FsStore {
    base_path: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `base_path`. The directory is created on
    /// first use, not here.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    fn ensure_key_safe(key: &str) -> StorageResult<()> {
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return Err(StorageError::InvalidObjectKey);
        }
        if key.starts_with('/') || key.contains("..") || key.ends_with(TAG_SIDECAR_SUFFIX) {
            return Err(StorageError::InvalidObjectKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StorageError::InvalidObjectKey);
        }
        Ok(())
    }

    fn container_root(&self, container: &str) -> PathBuf {
        self.base_path.join(container)
    }

    fn object_path(&self, location: &ObjectLocation) -> PathBuf {
        self.container_root(&location.container).join(&location.key)
    }

    fn sidecar_path(&self, location: &ObjectLocation) -> PathBuf {
        let mut path = self.object_path(location).into_os_string();
        path.push(TAG_SIDECAR_SUFFIX);
        PathBuf::from(path)
    }

    fn not_found(location: &ObjectLocation) -> StorageError {
        StorageError::ObjectNotFound {
            container: location.container.clone(),
            key: location.key.clone(),
        }
    }

    /// Tags of the object at `location`, if a sidecar exists.
    pub fn tags_of(&self, location: &ObjectLocation) -> Option<Tags> {
        let bytes = fs::read(self.sidecar_path(location)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Remove empty directories from `start` up to (but not including) `stop`.
    fn prune_empty_dirs(start: &Path, stop: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(stop) && current != stop {
            match fs::remove_dir(&current) {
                Ok(()) => match current.parent() {
                    Some(parent) => current = parent.to_path_buf(),
                    None => break,
                },
                Err(err) if err.kind() == ErrorKind::NotFound => break,
                Err(_) => break, // not empty, or not ours to remove
            }
        }
    }
}

impl ObjectStore for FsStore {
    fn create_container(&self, container: &str) -> StorageResult<()> {
        fs::create_dir_all(self.container_root(container))?;
        Ok(())
    }

    fn get(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>> {
        Self::ensure_key_safe(&location.key)?;
        fs::read(self.object_path(location)).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                Self::not_found(location)
            } else {
                StorageError::Io(err)
            }
        })
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8], tags: &Tags) -> StorageResult<()> {
        Self::ensure_key_safe(&location.key)?;
        let root = self.container_root(&location.container);
        if !root.is_dir() {
            return Err(StorageError::ContainerNotFound(location.container.clone()));
        }

        let file_path = self.object_path(location);
        let parent = file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StorageError::Io(io::Error::other("object path missing parent")))?;
        fs::create_dir_all(&parent)?;

        // Write to a temp file in the same directory, then rename over the
        // final path so readers never observe a partial payload.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = parent.join(format!(".tmp-{nanos}"));
        let result = (|| -> io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &file_path)
        })();
        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Io(err));
        }

        let sidecar = self.sidecar_path(location);
        if tags.is_empty() {
            let _ = fs::remove_file(&sidecar);
        } else {
            let body = serde_json::to_vec_pretty(tags)
                .map_err(|err| StorageError::Io(io::Error::other(err)))?;
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&sidecar)?;
            file.write_all(&body)?;
        }
        Ok(())
    }

    fn delete(&self, location: &ObjectLocation) -> StorageResult<()> {
        Self::ensure_key_safe(&location.key)?;
        let file_path = self.object_path(location);
        match fs::remove_file(&file_path) {
            Ok(()) => debug!("removed object file {}", file_path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Self::not_found(location));
            }
            Err(err) => return Err(StorageError::Io(err)),
        }
        let _ = fs::remove_file(self.sidecar_path(location));

        if let Some(parent) = file_path.parent() {
            Self::prune_empty_dirs(parent, &self.container_root(&location.container));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_keys() {
        assert!(FsStore::ensure_key_safe("../etc/passwd").is_err());
        assert!(FsStore::ensure_key_safe("/abs").is_err());
        assert!(FsStore::ensure_key_safe("").is_err());
        assert!(FsStore::ensure_key_safe("note.tags.json").is_err());
        assert!(FsStore::ensure_key_safe("acme/2026/08/07/data.csv").is_ok());
    }
}
