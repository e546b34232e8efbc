use crate::core::traits::KvStore;
use crate::utils::error::{AppError, AppResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory of registered users
pub const USERS_KEY: &str = "users_v2";
/// Currently signed-in profile
pub const SESSION_KEY: &str = "session_v2";
/// Bus registry
pub const BUSES_KEY: &str = "buses_v2";

/// Key-value store keeping one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir_exists(&self) -> AppResult<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                AppError::Io(format!(
                    "Failed to create data directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::System(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(key, path = %path.display(), "Loaded stored value");

        // An empty file is treated like a missing key
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.ensure_dir_exists()?;
        let path = self.path_for(key)?;

        std::fs::write(&path, value).map_err(|e| {
            AppError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!(key, bytes = value.len(), "Saved stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Removed stored value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-process store, used when nothing should touch the disk
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        (**self).remove(key)
    }
}

/// Memory store whose writes can be switched off, for exercising save failures
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FlakyKvStore {
    inner: MemoryKvStore,
    reject_writes: std::cell::Cell<bool>,
}

#[cfg(test)]
impl FlakyKvStore {
    pub(crate) fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

#[cfg(test)]
impl KvStore for FlakyKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.reject_writes.get() {
            return Err(AppError::Io("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        if self.reject_writes.get() {
            return Err(AppError::Io("disk full".to_string()));
        }
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flaky_store_switches_writes_off() {
        let store = FlakyKvStore::default();
        store.set(BUSES_KEY, "[]").unwrap();
        store.reject_writes(true);
        assert_eq!(
            store.set(BUSES_KEY, "[1]").unwrap_err(),
            AppError::Io("disk full".to_string())
        );
        assert_eq!(store.get(BUSES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(tmp.path().join("nested"));

        assert_eq!(store.get(USERS_KEY).unwrap(), None);
        store.set(USERS_KEY, "[]").unwrap();
        assert_eq!(store.get(USERS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(tmp.path().join("nested").join("users_v2.json").exists());

        store.remove(USERS_KEY).unwrap();
        assert_eq!(store.get(USERS_KEY).unwrap(), None);
        // removing twice is fine
        store.remove(USERS_KEY).unwrap();
    }

    #[test]
    fn test_file_store_empty_file_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("session_v2.json"), "  \n").unwrap();
        let store = FileKvStore::new(tmp.path());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(tmp.path());
        assert!(matches!(store.set("../escape", "x"), Err(AppError::System(_))));
        assert!(matches!(store.get(""), Err(AppError::System(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKvStore::new();
        store.set(BUSES_KEY, "[]").unwrap();
        store.set(BUSES_KEY, "[1]").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(BUSES_KEY).unwrap().as_deref(), Some("[1]"));
        store.remove(BUSES_KEY).unwrap();
        assert!(store.is_empty());
    }
}
