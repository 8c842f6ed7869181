//! File-backed snapshot store.
//!
//! One file per key under a storage directory, `<key>.json`. Keys are
//! sanitized so server-issued user IDs cannot escape the directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{PersistError, SnapshotStore};

/// Snapshot store writing one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_put_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("cart_guest").unwrap().is_none());

        store.put("cart_guest", "[]").unwrap();
        assert_eq!(store.get("cart_guest").unwrap().as_deref(), Some("[]"));

        store.put("cart_guest", r#"[{"productId":1}]"#).unwrap();
        assert_eq!(
            store.get("cart_guest").unwrap().as_deref(),
            Some(r#"[{"productId":1}]"#)
        );

        store.remove("cart_guest").unwrap();
        assert!(store.get("cart_guest").unwrap().is_none());

        // Removing an absent key is fine.
        store.remove("cart_guest").unwrap();
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put("cart_../../evil", "[]").unwrap();
        assert_eq!(store.get("cart_../../evil").unwrap().as_deref(), Some("[]"));

        // Nothing escaped the storage directory.
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("cart_------evil.json")]);
    }
}
