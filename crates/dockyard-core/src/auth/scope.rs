//! Key/value persistence scopes backing the credential store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, trace, warn};

use crate::error::StorageError;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Key under which the bearer token is stored in every scope.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key under which the serialised user info is stored in every scope.
pub const USER_INFO_KEY: &str = "user_info";

/// A string key/value store with a fixed lifetime.
pub trait StorageScope: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-lifetime scope held in memory.
#[derive(Debug, Default)]
pub struct MemoryScope {
    name: &'static str,
    entries: BTreeMap<String, String>,
}

impl MemoryScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: BTreeMap::new(),
        }
    }
}

impl StorageScope for MemoryScope {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Durable scope stored as one JSON object in a file.
///
/// Writes take an exclusive lock on a sibling `.lock` file so two processes
/// never interleave a read-modify-write. On Unix the data file is 0600.
#[derive(Debug, Clone)]
pub struct FileScope {
    path: PathBuf,
}

impl FileScope {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> StorageError {
        StorageError::Io {
            scope: "durable",
            message: format!("failed to {} {}: {}", action, self.path.display(), err),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&json).map_err(|e| StorageError::Malformed {
            scope: "durable",
            message: e.to_string(),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| self.io_error("remove", e))?;
            }
            return Ok(());
        }

        let json = serde_json::to_string_pretty(map).map_err(|e| StorageError::Malformed {
            scope: "durable",
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error("write", e))?;

        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path)
                .map_err(|e| self.io_error("stat", e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| self.io_error("chmod", e))?;
        }

        Ok(())
    }

    /// Run `f` while holding the exclusive file lock.
    fn locked<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce() -> Result<T, StorageError>,
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| self.io_error("open lock for", e))?;
        lock.lock_exclusive()
            .map_err(|e| self.io_error("lock", e))?;

        let result = f();

        let _ = lock.unlock();
        trace!(path = %self.path.display(), ok = result.is_ok(), "durable scope updated");
        result
    }

    /// Run a read-modify-write under the exclusive file lock.
    fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        self.locked(|| {
            let mut map = self.read_map()?;
            f(&mut map);
            self.write_map(&map)
        })
    }
}

impl StorageScope for FileScope {
    fn name(&self) -> &'static str {
        "durable"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(key, path = %self.path.display(), "writing durable credential");
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.locked(|| match self.read_map() {
            Ok(mut map) => {
                map.remove(key);
                self.write_map(&map)
            }
            // Nothing in an unreadable file can be kept, so drop all of it.
            Err(StorageError::Malformed { message, .. }) => {
                warn!(path = %self.path.display(), %message, "Discarding unreadable durable scope");
                self.write_map(&BTreeMap::new())
            }
            Err(e) => Err(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_scope_set_get_remove() {
        let mut scope = MemoryScope::new("session");
        assert_eq!(scope.get(ACCESS_TOKEN_KEY).unwrap(), None);

        scope.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        assert_eq!(scope.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("tok"));

        scope.remove(ACCESS_TOKEN_KEY).unwrap();
        scope.remove(ACCESS_TOKEN_KEY).unwrap();
        assert_eq!(scope.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn file_scope_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let mut scope = FileScope::new(&path);
        scope.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        scope.set(USER_INFO_KEY, "{\"username\":\"dispatch\"}").unwrap();

        let reopened = FileScope::new(&path);
        assert_eq!(
            reopened.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("tok")
        );
        assert!(reopened.get(USER_INFO_KEY).unwrap().is_some());
    }

    #[test]
    fn file_scope_removes_file_when_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        let mut scope = FileScope::new(&path);
        scope.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        assert!(path.exists());

        scope.remove(ACCESS_TOKEN_KEY).unwrap();
        assert!(!path.exists());
        scope.remove(ACCESS_TOKEN_KEY).unwrap();
    }

    #[test]
    fn file_scope_reports_malformed_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let scope = FileScope::new(&path);
        assert!(matches!(
            scope.get(ACCESS_TOKEN_KEY),
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn remove_discards_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{\"access_token\": \"tok\"").unwrap();

        let mut scope = FileScope::new(&path);
        scope.remove(ACCESS_TOKEN_KEY).unwrap();
        assert!(!path.exists());

        scope.remove(USER_INFO_KEY).unwrap();
        assert_eq!(scope.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_scope_is_private() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        let mut scope = FileScope::new(&path);
        scope.set(ACCESS_TOKEN_KEY, "tok").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
