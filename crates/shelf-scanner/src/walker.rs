//! Discovery of item folders and importable files.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8PathBuf;
//! use shelf_core::ExtensionSet;
//! use shelf_scanner::FolderWalker;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
//! std::fs::create_dir(root.join("Sample Title")).unwrap();
//! std::fs::create_dir(root.join(".hidden")).unwrap();
//! std::fs::write(root.join("stray.pdf"), b"%PDF").unwrap();
//!
//! let walker = FolderWalker::new(ExtensionSet::new([".pdf"]));
//! let folders = walker.list_folders(&root).unwrap();
//! assert_eq!(folders.len(), 1);
//! assert_eq!(folders[0].0, "Sample Title");
//! ```

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use shelf_core::ExtensionSet;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::ScanError;

/// Marker prefix of entries that are never considered.
const HIDDEN_PREFIX: char = '.';

/// Files found directly inside one item folder.
pub type FileList = SmallVec<[Utf8PathBuf; 4]>;

/// Lists candidate folders under a watch root and importable files inside
/// each folder. Nothing is traversed recursively.
#[derive(Debug, Clone)]
pub struct FolderWalker {
    extensions: ExtensionSet,
}

impl FolderWalker {
    /// Creates a walker accepting files with the given extensions.
    #[inline]
    #[must_use]
    pub const fn new(extensions: ExtensionSet) -> Self {
        Self { extensions }
    }

    /// Returns the accepted extensions.
    #[inline]
    #[must_use]
    pub const fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Lists `(name, path)` for every visible subdirectory of `root`.
    ///
    /// An entry that cannot be read or stat'ed is skipped with a warning;
    /// only a failure to list `root` itself is an error. Results are sorted
    /// by name.
    pub fn list_folders(&self, root: &Utf8Path) -> Result<Vec<(String, Utf8PathBuf)>, ScanError> {
        let entries = fs::read_dir(root).map_err(|e| ScanError::read_dir(root, e))?;

        let mut folders = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                warn!(error = %ScanError::NonUtf8Path(entry.path()), "Skipping entry");
                continue;
            };
            if name.starts_with(HIDDEN_PREFIX) {
                continue;
            }

            let path = root.join(&name);
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => folders.push((name, path)),
                Ok(_) => {}
                Err(e) => warn!(path = %path, error = %e, "Skipping entry that cannot be inspected"),
            }
        }

        folders.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(root = %root, count = folders.len(), "Listed candidate folders");
        Ok(folders)
    }

    /// Lists files with an accepted extension directly inside `folder`.
    pub fn importable_files(&self, folder: &Utf8Path) -> Result<FileList, ScanError> {
        let entries = fs::read_dir(folder).map_err(|e| ScanError::read_dir(folder, e))?;

        let mut files = FileList::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let path = folder.join(name);
            if !self.extensions.matches(&path) {
                continue;
            }
            if fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
