//! Import statistics with atomic counters.
//!
//! Counters live for the process lifetime only; nothing here is persisted.
//! All counters use relaxed ordering since they are read for display.
//!
//! # Examples
//!
//! ```
//! use shelf_scanner::ImportStats;
//!
//! let stats = ImportStats::new();
//! stats.increment_imported();
//! stats.set_pending(3);
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.imported, 1);
//! assert_eq!(snapshot.pending, 3);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-wide import counters.
#[derive(Debug, Default)]
pub struct ImportStats {
    /// Files imported into the catalog.
    imported: AtomicU64,
    /// Folders waiting in the watch root after the last listing.
    pending: AtomicU64,
    /// Folders moved into the archive root.
    archived: AtomicU64,
    /// Files whose import failed.
    failures: AtomicU64,
}

impl ImportStats {
    /// Creates a new [`ImportStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the imported files counter.
    #[inline]
    pub fn increment_imported(&self) {
        self.imported.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the archived folders counter.
    #[inline]
    pub fn increment_archived(&self) {
        self.archived.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the failed imports counter.
    #[inline]
    pub fn increment_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Sets the number of folders waiting to be processed.
    #[inline]
    pub fn set_pending(&self, pending: u64) {
        self.pending.store(pending, Ordering::Relaxed);
    }

    /// Returns the number of imported files.
    #[inline]
    #[must_use]
    pub fn imported(&self) -> u64 {
        self.imported.load(Ordering::Relaxed)
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            imported: self.imported.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
            archived: self.archived.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`ImportStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Files imported into the catalog.
    pub imported: u64,
    /// Folders waiting in the watch root.
    pub pending: u64,
    /// Folders moved into the archive root.
    pub archived: u64,
    /// Files whose import failed.
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ImportStats::new();
        stats.increment_imported();
        stats.increment_imported();
        stats.increment_archived();
        stats.increment_failures();
        stats.set_pending(4);
        stats.set_pending(1);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                imported: 2,
                pending: 1,
                archived: 1,
                failures: 1,
            }
        );
        assert_eq!(stats.imported(), 2);
    }
}
