use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use crate::errors::{StoreError, StoreResult};

/// Synchronous key -> string store, one JSON document per key under the
/// configured data directory. `set` stages the payload in a temp file and
/// renames it into place, so a key is never observed half-written.
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(self.dir.as_ref())?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.path_for(key)).map_err(|e| StoreError::Persist {
            key: key.to_string(),
            source: e.error,
        })?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            // Removing an absent key is not an error
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

impl Clone for FileStore {
    fn clone(&self) -> Self {
        Self {
            dir: self.dir.clone(),
        }
    }
}

/// Reads and deserializes one key, degrading to the default on a missing
/// key, an unreadable store, or a corrupt payload. Startup must never fail
/// because the data directory is damaged.
pub(crate) fn load_or_default<T>(store: &FileStore, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    let data = match store.get(key) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to read key {}: {}", key, e);
            return T::default();
        }
    };
    match data {
        Some(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!("Discarding corrupt payload for key {}: {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}
