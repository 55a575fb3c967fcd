//! Bounded, most-recent-first activity log.
//!
//! [`ActivityLog`] is the operational log a host shows to its users. Every
//! entry is also emitted as a `tracing` event, so the log stream is never
//! lost when nobody reads the buffer.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Severity of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Progress note.
    Info,
    /// Something was imported or archived.
    Success,
    /// Something was skipped.
    Warning,
    /// Something failed.
    Error,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Local>,
    /// Severity.
    pub level: ActivityLevel,
    /// Human-readable message.
    pub message: String,
}

/// A bounded log buffer holding the newest entries first.
///
/// # Examples
///
/// ```
/// use shelf_scanner::{ActivityLevel, ActivityLog};
///
/// let log = ActivityLog::new(2);
/// log.info("one");
/// log.warning("two");
/// log.success("three");
///
/// let entries = log.entries();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].message, "three");
/// assert_eq!(entries[1].level, ActivityLevel::Warning);
/// ```
#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ActivityLog {
    /// Creates a log keeping at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Returns the maximum number of entries kept.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an entry, dropping the oldest one when full.
    pub fn push(&self, level: ActivityLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ActivityLevel::Info | ActivityLevel::Success => {
                info!(outcome = %level, "{message}");
            }
            ActivityLevel::Warning => warn!("{message}"),
            ActivityLevel::Error => error!("{message}"),
        }

        let mut entries = self.entries.lock();
        entries.push_front(ActivityEntry {
            timestamp: Local::now(),
            level,
            message,
        });
        entries.truncate(self.capacity);
    }

    /// Records an [`ActivityLevel::Info`] entry.
    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.push(ActivityLevel::Info, message);
    }

    /// Records an [`ActivityLevel::Success`] entry.
    #[inline]
    pub fn success(&self, message: impl Into<String>) {
        self.push(ActivityLevel::Success, message);
    }

    /// Records an [`ActivityLevel::Warning`] entry.
    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.push(ActivityLevel::Warning, message);
    }

    /// Records an [`ActivityLevel::Error`] entry.
    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.push(ActivityLevel::Error, message);
    }

    /// Returns a copy of the entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Returns the number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_bounded() {
        let log = ActivityLog::default();
        for i in 0..60 {
            log.info(format!("entry {i}"));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), DEFAULT_CAPACITY);
        assert_eq!(entries[0].message, "entry 59");
        assert_eq!(entries[DEFAULT_CAPACITY - 1].message, "entry 10");
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let log = ActivityLog::new(0);
        log.error("a");
        log.error("b");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].message, "b");
    }

    #[test]
    fn test_clear() {
        let log = ActivityLog::new(5);
        log.success("done");
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ActivityLevel::Warning).unwrap(),
            r#""warning""#
        );
    }
}
