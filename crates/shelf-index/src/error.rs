//! Error types for the shelf-index crate.

use camino::Utf8PathBuf;

/// Errors raised while reading or writing a JSON document.
///
/// The public [`JsonStore`](crate::JsonStore) contract never propagates
/// these: `read` turns them into `None` and `write` into `false` after
/// logging. The `try_*` methods expose them for callers that need detail.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Document path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not valid for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Document path.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize document for {path}: {source}")]
    Serialize {
        /// Document path.
        path: Utf8PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Document path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Returns `true` if the document simply does not exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// Returns the path of the document involved.
    #[must_use]
    pub const fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Serialize { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}
