use std::path::{Path, PathBuf};
#[cfg(test)]
use std::{collections::HashMap, sync::RwLock};

/// Scoped key-value persistence. Each key maps to one opaque blob.
pub trait StorageManager: Send + Sync {
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()>;
    fn read(&self, key: &str) -> std::io::Result<Vec<u8>>;
    fn exists(&self, key: &str) -> bool;
    fn delete(&self, key: &str) -> std::io::Result<()>;
}

#[derive(Clone, Debug)]
pub struct BackendLocal {
    pub base_dir: PathBuf,
}

impl BackendLocal {
    pub fn new(storage_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let base_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(BackendLocal { base_dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

impl StorageManager for BackendLocal {
    fn exists(&self, key: &str) -> bool {
        std::fs::metadata(self.path(key)).is_ok()
    }

    fn read(&self, key: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path(key))
    }

    // readers see either the old or the new blob, never a partial one
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        let temp_path = self
            .base_dir
            .join(format!(".{}-{key}", rusty_ulid::generate_ulid_string()));

        std::fs::write(&temp_path, data)?;

        std::fs::rename(&temp_path, self.path(key))
    }

    fn delete(&self, key: &str) -> std::io::Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Process-local storage for tests.
#[cfg(test)]
#[derive(Default)]
pub struct BackendMemory {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl StorageManager for BackendMemory {
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        self.entries
            .write()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> std::io::Result<Vec<u8>> {
        self.entries
            .read()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?
            .get(key)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, key.to_string()))
    }

    fn exists(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn delete(&self, key: &str) -> std::io::Result<()> {
        self.entries
            .write()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?
            .remove(key);
        Ok(())
    }
}
