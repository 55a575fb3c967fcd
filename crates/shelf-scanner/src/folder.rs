//! One item folder as seen during a scan.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use shelf_core::{Metadata, WatchConfig};
use tracing::debug;

use crate::error::ScanError;
use crate::walker::FileList;

/// A subfolder of the watch root, discovered during a scan.
///
/// The folder name is its identity: it keys the index entry and names the
/// destination under the archive root.
#[derive(Debug, Clone)]
pub struct WatchFolder {
    /// Absolute path of the folder.
    pub path: Utf8PathBuf,
    /// Folder name.
    pub name: String,
    /// Importable files directly inside the folder.
    pub files: FileList,
    /// Parsed sidecar metadata, if present and valid.
    pub metadata: Option<Metadata>,
    /// Cover image, if present.
    pub cover: Option<Utf8PathBuf>,
}

impl WatchFolder {
    /// Returns the destination of this folder under `archive_root`.
    #[must_use]
    pub fn archive_destination(&self, archive_root: &Utf8Path) -> Utf8PathBuf {
        archive_root.join(&self.name)
    }
}

/// Reads the metadata sidecar named by `config.metadata_file`.
///
/// Returns `Ok(None)` when the folder has no sidecar. Otherwise returns the
/// metadata together with the keys that were ignored for holding the wrong
/// kind of value.
pub fn read_metadata(
    folder: &Utf8Path,
    config: &WatchConfig,
) -> Result<Option<(Metadata, Vec<&'static str>)>, ScanError> {
    let path = folder.join(&config.metadata_file);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ScanError::read(path, e)),
    };
    let (metadata, ignored) = Metadata::from_json(&text).map_err(|source| ScanError::Metadata {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path, ?ignored, "Loaded metadata");
    Ok(Some((metadata, ignored)))
}

/// Returns the cover image named by `config.cover_file`, if it exists.
#[must_use]
pub fn find_cover(folder: &Utf8Path, config: &WatchConfig) -> Option<Utf8PathBuf> {
    if config.cover_file.is_empty() {
        return None;
    }
    let path = folder.join(&config.cover_file);
    path.is_file().then_some(path)
}
