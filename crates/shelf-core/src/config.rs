//! Configuration structures for comic-shelf.
//!
//! This module provides configuration types for all components of the importer:
//!
//! - [`WatchConfig`] - Watch/archive roots and which files qualify for import
//! - [`ScheduleConfig`] - Scan interval and startup behaviour
//! - [`IndexConfig`] - Location of the import index and public link bases
//! - [`LogConfig`] - Activity log verbosity and capacity
//! - [`Config`] - Root configuration combining all settings
//!
//! Every section implements [`Default`] and deserializes with
//! `#[serde(default)]`, so a configuration file only needs the keys it
//! overrides.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A case-insensitive set of allowed file extensions.
///
/// Extensions are stored lowercase without the leading dot, so `".PDF"`,
/// `"pdf"` and `".pdf"` all describe the same entry.
///
/// # Examples
///
/// ```
/// use shelf_core::ExtensionSet;
/// use camino::Utf8Path;
///
/// let set = ExtensionSet::new([".pdf"]);
/// assert!(set.matches(Utf8Path::new("book.PDF")));
/// assert!(!set.matches(Utf8Path::new("cover.jpg")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet {
    extensions: FxHashSet<String>,
}

impl ExtensionSet {
    /// Creates a set from any list of extensions, with or without dots.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// Returns `true` if the path's extension is in the set.
    #[must_use]
    pub fn matches(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    /// Returns `true` if no extensions are allowed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Returns the number of allowed extensions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(extensions: Vec<String>) -> Self {
        Self::new(extensions)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        let mut extensions: Vec<String> = set
            .extensions
            .into_iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

/// Configuration for the watched directory tree.
///
/// # Examples
///
/// ```
/// use shelf_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.metadata_file, "metadata.json");
/// assert_eq!(config.cover_file, "cover.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory scanned for item folders.
    pub watch_root: Utf8PathBuf,

    /// Directory receiving item folders once imported.
    pub archive_root: Utf8PathBuf,

    /// File extensions handed to the catalog (case-insensitive).
    pub allowed_extensions: ExtensionSet,

    /// Name of the sidecar metadata document inside an item folder.
    pub metadata_file: String,

    /// Name of the optional cover image inside an item folder.
    pub cover_file: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_root: Utf8PathBuf::new(),
            archive_root: Utf8PathBuf::new(),
            allowed_extensions: ExtensionSet::new([".pdf"]),
            metadata_file: "metadata.json".to_owned(),
            cover_file: "cover.jpg".to_owned(),
        }
    }
}

/// Configuration for the scan schedule.
///
/// # Examples
///
/// ```
/// use shelf_core::ScheduleConfig;
/// use std::time::Duration;
///
/// let config = ScheduleConfig::default();
/// assert_eq!(config.interval(), Duration::from_secs(30));
/// assert!(config.scan_on_start);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between two scan cycles.
    pub interval_secs: u64,

    /// Whether to run one scan shortly after start.
    pub scan_on_start: bool,

    /// Delay before the startup scan, letting the host finish initializing.
    pub startup_delay_ms: u64,
}

impl ScheduleConfig {
    /// Returns the scan interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Returns the startup delay as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            scan_on_start: true,
            startup_delay_ms: 2000,
        }
    }
}

/// Configuration for the import index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path of the JSON index document.
    pub index_path: Utf8PathBuf,

    /// Root of the catalog's image storage.
    ///
    /// Stripped from catalog file paths to build the relative storage path.
    pub images_root: Utf8PathBuf,

    /// Base URL serving the catalog's image storage.
    pub web_base_url_eagle: String,

    /// Base URL serving the download folders.
    pub web_base_url_downloads: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: Utf8PathBuf::from("imports-index.json"),
            images_root: Utf8PathBuf::new(),
            web_base_url_eagle: "http://localhost:8889".to_owned(),
            web_base_url_downloads: "http://localhost:8888".to_owned(),
        }
    }
}

/// Configuration for the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Record per-file progress notes in the activity log.
    pub verbose: bool,

    /// Number of entries kept in the activity log.
    pub capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            capacity: 50,
        }
    }
}

/// Root configuration for comic-shelf.
///
/// # Examples
///
/// ```
/// use shelf_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"schedule": {"interval_secs": 60}}"#).unwrap();
/// assert_eq!(config.schedule.interval_secs, 60);
/// assert!(config.schedule.scan_on_start);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Watch and archive settings.
    pub watch: WatchConfig,

    /// Scan schedule.
    pub schedule: ScheduleConfig,

    /// Import index settings.
    pub index: IndexConfig,

    /// Activity log settings.
    pub log: LogConfig,
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not a valid document, or
    /// [`ConfigError::InvalidOption`] if a value is out of range.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that can never work.
    ///
    /// Watch and archive paths are deliberately not checked here: they are
    /// validated at the start of every scan cycle so an unavailable share is
    /// retried on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::invalid_option(
                "schedule.interval_secs",
                "must be greater than zero",
            ));
        }
        if self.log.capacity == 0 {
            return Err(ConfigError::invalid_option(
                "log.capacity",
                "must be greater than zero",
            ));
        }
        if self.watch.allowed_extensions.is_empty() {
            return Err(ConfigError::invalid_option(
                "watch.allowed_extensions",
                "at least one extension is required",
            ));
        }
        Ok(())
    }
}
