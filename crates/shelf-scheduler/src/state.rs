//! Process-wide scan state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shelf_scanner::{ActivityLog, ImportStats};

/// Shared state of the importer: the scan-in-progress flag, the counters
/// and the activity log.
///
/// # Examples
///
/// ```
/// use shelf_scheduler::ScanState;
///
/// let state = ScanState::new(50);
/// let guard = state.try_begin_scan().unwrap();
/// assert!(state.is_scanning());
/// assert!(state.try_begin_scan().is_none());
///
/// drop(guard);
/// assert!(!state.is_scanning());
/// ```
#[derive(Debug)]
pub struct ScanState {
    in_progress: AtomicBool,
    stats: Arc<ImportStats>,
    log: Arc<ActivityLog>,
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new(shelf_scanner::DEFAULT_CAPACITY)
    }
}

impl ScanState {
    /// Creates idle state with an activity log of the given capacity.
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            in_progress: AtomicBool::new(false),
            stats: Arc::new(ImportStats::new()),
            log: Arc::new(ActivityLog::new(log_capacity)),
        }
    }

    /// Marks a scan as started.
    ///
    /// Returns `None` if a scan is already running. The flag is cleared when
    /// the returned guard is dropped, including on early return.
    #[must_use]
    pub fn try_begin_scan(&self) -> Option<ScanGuard<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanGuard {
                flag: &self.in_progress,
            })
    }

    /// Returns `true` while a scan is running.
    #[inline]
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Returns the shared counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &Arc<ImportStats> {
        &self.stats
    }

    /// Returns the shared activity log.
    #[inline]
    #[must_use]
    pub const fn log(&self) -> &Arc<ActivityLog> {
        &self.log
    }
}

/// Clears the scan-in-progress flag on drop.
#[derive(Debug)]
pub struct ScanGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
