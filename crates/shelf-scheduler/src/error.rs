//! Error types for the shelf-scheduler crate.

use camino::Utf8PathBuf;
use shelf_core::{ConfigError, PathRejection};
use shelf_scanner::ScanError;

/// Reasons a scan cycle is aborted or the scheduler cannot start.
///
/// An aborted cycle is retried on the next tick; none of these stop the
/// scheduler once it runs.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A configured root cannot be handed to the catalog.
    #[error("{role} root {path} is invalid: {source}")]
    InvalidPath {
        /// Which root (`watch` or `archive`).
        role: &'static str,
        /// The configured path.
        path: Utf8PathBuf,
        /// Why it was rejected.
        #[source]
        source: PathRejection,
    },

    /// The watch root is not a reachable directory.
    #[error("watch root {0} does not exist or is not a directory")]
    WatchRootUnavailable(Utf8PathBuf),

    /// The archive root could not be created.
    #[error("failed to create archive root {path}: {source}")]
    CreateArchiveRoot {
        /// The archive root.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The watch root could not be listed.
    #[error("failed to list watch root: {0}")]
    List(#[from] ScanError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScheduleError {
    /// Returns `true` if the problem may go away by itself, such as a
    /// network share that is temporarily unmounted.
    #[inline]
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::WatchRootUnavailable(_) | Self::CreateArchiveRoot { .. } | Self::List(_)
        )
    }
}
