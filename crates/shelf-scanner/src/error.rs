//! Error types for the shelf-scanner crate.
//!
//! - [`CatalogError`]: a call into the host catalog failed
//! - [`MoveError`]: a folder could not be archived
//! - [`ScanError`]: processing a folder stopped early
//!
//! None of these terminate a scan cycle. The worst outcome is a folder that
//! stays in the watch root and is retried on the next cycle.

use camino::Utf8PathBuf;
use shelf_core::{ItemId, PathRejection};

/// Errors reported by a [`Catalog`](crate::Catalog) implementation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request could not be completed.
    #[error("catalog request failed: {0}")]
    Request(String),

    /// The catalog refused the file.
    #[error("catalog rejected {path}: {reason}")]
    Rejected {
        /// The file that was refused.
        path: Utf8PathBuf,
        /// The catalog's explanation.
        reason: String,
    },

    /// The item does not exist in the catalog.
    #[error("catalog item {0} not found")]
    NotFound(ItemId),
}

impl CatalogError {
    /// Creates a new [`CatalogError::Request`] error.
    #[inline]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}

/// Errors raised while moving a folder into the archive root.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// There is nothing to move.
    #[error("source folder {0} does not exist")]
    SourceMissing(Utf8PathBuf),

    /// The rename failed and left neither source nor destination behind.
    #[error("folder lost while moving {source_path} to {destination}")]
    Lost {
        /// Where the folder was.
        source_path: Utf8PathBuf,
        /// Where it should have gone.
        destination: Utf8PathBuf,
    },

    /// A filesystem operation failed; the source is still in place.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        /// What was being done.
        operation: &'static str,
        /// The path involved.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MoveError {
    /// Creates a new [`MoveError::Io`] error.
    #[inline]
    pub fn io(operation: &'static str, path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the folder is gone with no copy left anywhere.
    #[inline]
    #[must_use]
    pub const fn is_loss(&self) -> bool {
        matches!(self, Self::Lost { .. })
    }
}

/// Errors that stop the processing of one folder.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The folder path cannot be handed to the catalog.
    #[error("invalid folder path: {0}")]
    InvalidPath(#[from] PathRejection),

    /// A directory could not be listed.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// The directory that couldn't be listed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata sidecar is not a valid document.
    #[error("failed to parse metadata {path}: {source}")]
    Metadata {
        /// The sidecar path.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A directory entry's name is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The folder could not be archived.
    #[error(transparent)]
    Archive(#[from] MoveError),

    /// A blocking filesystem task did not complete.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Creates a new [`ScanError::ReadDir`] error.
    #[inline]
    pub fn read_dir(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the folder stays in place and will be retried.
    ///
    /// Only a lost folder is unrecoverable.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Archive(e) if e.is_loss())
    }
}
