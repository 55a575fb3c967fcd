//! Whole-document JSON persistence.
//!
//! [`JsonStore`] reads and writes a single JSON document. Writes go to a
//! sibling temporary file that is renamed over the target, so readers only
//! ever see the previous or the new document, never a partial one.
//!
//! Failures are logged and reported as `None`/`false`; callers fall back to
//! a safe default instead of treating them as fatal.

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::StoreError;

/// A JSON document stored at a fixed path.
///
/// # Examples
///
/// ```
/// use shelf_index::JsonStore;
/// use camino::Utf8PathBuf;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("doc.json")).unwrap();
/// let store = JsonStore::new(path);
///
/// assert!(store.read::<serde_json::Value>().is_none());
/// assert!(store.write(&serde_json::json!({"imports": {}})));
/// assert!(store.read::<serde_json::Value>().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: Utf8PathBuf,
}

impl JsonStore {
    /// Creates a store for the document at `path`.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the document path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads and parses the document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] or [`StoreError::Parse`].
    pub fn try_read<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads the document, logging and returning `None` on any failure.
    #[must_use]
    pub fn read<T: DeserializeOwned>(&self) -> Option<T> {
        match self.try_read() {
            Ok(document) => Some(document),
            Err(e) if e.is_not_found() => {
                warn!(path = %self.path, "JSON document does not exist");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to read JSON document");
                None
            }
        }
    }

    /// Serializes and atomically replaces the document.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] or [`StoreError::Write`].
    pub fn try_write<T: Serialize + ?Sized>(&self, document: &T) -> Result<(), StoreError> {
        let content =
            serde_json::to_vec_pretty(document).map_err(|source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = self.temp_path();
        let result = (|| {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&content)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        debug!(path = %self.path, bytes = content.len(), "JSON document written");
        Ok(())
    }

    /// Writes the document, logging and returning `false` on any failure.
    pub fn write<T: Serialize + ?Sized>(&self, document: &T) -> bool {
        match self.try_write(document) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to write JSON document");
                false
            }
        }
    }

    fn temp_path(&self) -> Utf8PathBuf {
        let name = self.path.file_name().unwrap_or("document.json");
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    fn store_in(dir: &TempDir, name: &str) -> JsonStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        JsonStore::new(path)
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "doc.json");
        let doc = Doc {
            name: "x".to_owned(),
            count: 3,
        };

        assert!(store.write(&doc));
        assert_eq!(store.read::<Doc>(), Some(doc));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_missing_document_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "missing.json");
        assert!(store.read::<Doc>().is_none());
        assert!(store.try_read::<Doc>().unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_document_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "doc.json");
        fs::write(store.path(), "{\"name\": \"x\", \"count\": ").unwrap();

        assert!(store.read::<Doc>().is_none());
        assert!(matches!(
            store.try_read::<Doc>(),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "nested/deeper/doc.json");
        assert!(store.write(&serde_json::json!({"a": 1})));
        assert!(store.path().exists());
    }

    #[test]
    fn test_write_replaces_whole_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "doc.json");
        assert!(store.write(&serde_json::json!({"old": true, "keep": false})));
        assert!(store.write(&serde_json::json!({"new": true})));

        let value: serde_json::Value = store.read().unwrap();
        assert_eq!(value, serde_json::json!({"new": true}));
    }

    #[test]
    fn test_write_into_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = store_in(&dir, "blocker");
        fs::write(blocker.path(), "not a directory").unwrap();

        let store = JsonStore::new(blocker.path().join("doc.json"));
        assert!(!store.write(&serde_json::json!({})));
        assert!(matches!(
            store.try_write(&serde_json::json!({})),
            Err(StoreError::Write { .. })
        ));
    }
}
