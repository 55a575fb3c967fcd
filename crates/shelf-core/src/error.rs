//! Errors raised while loading the importer configuration.

use camino::Utf8PathBuf;

/// Why a configuration file could not be turned into a usable [`Config`].
///
/// Watch and archive roots are not checked at load time, so none of these
/// variants describe an unreachable share.
///
/// [`Config`]: crate::Config
///
/// # Examples
///
/// ```
/// use shelf_core::ConfigError;
///
/// let error = ConfigError::invalid_option("log.capacity", "must be greater than zero");
/// assert_eq!(
///     error.to_string(),
///     "log.capacity: must be greater than zero",
/// );
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Read {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not a valid JSON configuration.
    #[error("configuration {path} is malformed: {source}")]
    Parse {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An option holds a value the importer cannot work with.
    #[error("{option}: {reason}")]
    InvalidOption {
        /// Dotted name of the option, e.g. `schedule.interval_secs`.
        option: String,
        /// What is wrong with the value.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Returns the configuration file involved, if any.
    #[must_use]
    pub const fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => Some(path),
            Self::InvalidOption { .. } => None,
        }
    }
}
