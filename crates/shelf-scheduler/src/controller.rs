//! One scan cycle over the watch root.

use std::fs;
use std::sync::Arc;

use camino::Utf8Path;
use shelf_core::{Config, normalize, validate};
use shelf_scanner::{Catalog, FolderMover, FolderProcessor};
use tracing::{debug, info_span, Instrument};

use crate::error::ScheduleError;
use crate::state::ScanState;

/// What a call to [`ScanController::run_scan_cycle`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was already running.
    Skipped,
    /// The cycle stopped before processing any folder.
    Aborted {
        /// Why the cycle stopped.
        reason: String,
    },
    /// Every candidate folder was attempted.
    Completed {
        /// Candidate folders found.
        discovered: usize,
        /// Folders imported and archived.
        processed: usize,
    },
}

/// Runs scan cycles, at most one at a time.
///
/// Folders are processed strictly one after another, so the import index
/// and the catalog are never used concurrently.
#[derive(Debug)]
pub struct ScanController<C> {
    processor: FolderProcessor<C>,
    state: Arc<ScanState>,
}

impl<C: Catalog> ScanController<C> {
    /// Creates a controller with fresh state.
    #[must_use]
    pub fn new(catalog: C, config: &Config) -> Self {
        Self::with_state(catalog, config, Arc::new(ScanState::new(config.log.capacity)))
    }

    /// Creates a controller sharing existing state.
    #[must_use]
    pub fn with_state(catalog: C, config: &Config, state: Arc<ScanState>) -> Self {
        let processor = FolderProcessor::new(
            catalog,
            config,
            Arc::clone(state.stats()),
            Arc::clone(state.log()),
        );
        Self { processor, state }
    }

    /// Replaces the folder mover.
    #[must_use]
    pub fn with_mover(mut self, mover: FolderMover) -> Self {
        self.processor = self.processor.with_mover(mover);
        self
    }

    /// Returns the shared state.
    #[inline]
    pub const fn state(&self) -> &Arc<ScanState> {
        &self.state
    }

    /// Returns the folder processor.
    #[inline]
    pub const fn processor(&self) -> &FolderProcessor<C> {
        &self.processor
    }

    /// Runs one scan cycle.
    ///
    /// If a cycle is already running this logs a warning and returns
    /// [`CycleOutcome::Skipped`] at once. Configuration and listing problems
    /// abort the cycle; the next call tries again.
    pub async fn run_scan_cycle(&self) -> CycleOutcome {
        let log = self.state.log();
        let Some(_guard) = self.state.try_begin_scan() else {
            log.warning("Scan already in progress, skipping");
            return CycleOutcome::Skipped;
        };

        match self.scan().instrument(info_span!("scan_cycle")).await {
            Ok((discovered, processed)) => {
                if processed > 0 {
                    log.success(format!(
                        "Scan complete: {processed} of {discovered} folder(s) processed"
                    ));
                } else {
                    log.info(format!(
                        "Scan complete: no folder processed ({discovered} found)"
                    ));
                }
                CycleOutcome::Completed {
                    discovered,
                    processed,
                }
            }
            Err(e) if e.is_transient() => {
                log.warning(format!("Scan aborted: {e}, retrying on the next tick"));
                CycleOutcome::Aborted {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                log.error(format!("Scan aborted: {e}"));
                CycleOutcome::Aborted {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn scan(&self) -> Result<(usize, usize), ScheduleError> {
        let watch = self.processor.watch_config();
        check_root("watch", &watch.watch_root)?;
        if !watch.watch_root.is_dir() {
            return Err(ScheduleError::WatchRootUnavailable(watch.watch_root.clone()));
        }

        check_root("archive", &watch.archive_root)?;
        fs::create_dir_all(&watch.archive_root).map_err(|source| {
            ScheduleError::CreateArchiveRoot {
                path: watch.archive_root.clone(),
                source,
            }
        })?;

        let folders = self.processor.walker().list_folders(&watch.watch_root)?;
        let discovered = folders.len();
        let stats = self.state.stats();
        stats.set_pending(discovered as u64);
        debug!(discovered, "Scanning candidate folders");

        let mut processed = 0;
        for (name, path) in &folders {
            if self.processor.process(path, name).await {
                processed += 1;
            }
        }

        stats.set_pending((discovered - processed) as u64);
        Ok((discovered, processed))
    }
}

fn check_root(role: &'static str, path: &Utf8Path) -> Result<(), ScheduleError> {
    validate(&normalize(path.as_str())).map_err(|source| ScheduleError::InvalidPath {
        role,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use shelf_scanner::ActivityLevel;
    use shelf_scanner::testing::MockCatalog;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.watch.watch_root = root.join("watch");
        config.watch.archive_root = root.join("archive");
        config.index.index_path = root.join("imports-index.json");
        config
    }

    #[tokio::test]
    async fn test_missing_watch_root_aborts() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let controller = ScanController::new(MockCatalog::new("/library"), &config);

        let outcome = controller.run_scan_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Aborted { ref reason } if reason.contains("does not exist")));
        assert!(!controller.state().is_scanning());
        let entries = controller.state().log().entries();
        assert_eq!(entries[0].level, ActivityLevel::Warning);
        assert!(entries[0].message.contains("retrying on the next tick"));
        assert!(!config.watch.archive_root.exists());
    }

    #[tokio::test]
    async fn test_network_share_watch_root_aborts() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.watch.watch_root = Utf8PathBuf::from(r"\\192.168.10.2\docker\downloads");
        let controller = ScanController::new(MockCatalog::new("/library"), &config);

        let outcome = controller.run_scan_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Aborted { ref reason } if reason.contains("network share")));
        assert_eq!(controller.state().log().entries()[0].level, ActivityLevel::Error);
    }

    #[tokio::test]
    async fn test_empty_watch_root_completes() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(&config.watch.watch_root).unwrap();
        let controller = ScanController::new(MockCatalog::new("/library"), &config);

        assert_eq!(
            controller.run_scan_cycle().await,
            CycleOutcome::Completed {
                discovered: 0,
                processed: 0,
            }
        );
        assert!(config.watch.archive_root.is_dir());
    }

    #[tokio::test]
    async fn test_skips_while_scanning() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(&config.watch.watch_root).unwrap();
        let controller = ScanController::new(MockCatalog::new("/library"), &config);

        let guard = controller.state().try_begin_scan().unwrap();
        assert_eq!(controller.run_scan_cycle().await, CycleOutcome::Skipped);
        drop(guard);
        assert!(matches!(
            controller.run_scan_cycle().await,
            CycleOutcome::Completed { .. }
        ));
    }
}
