//! Startup and interval timers driving the scan controller.
//!
//! ```text
//! start()
//!   ├── startup task:  sleep(startup_delay) -> run_scan_cycle()
//!   └── interval task: every tick -> spawn(run_scan_cycle())
//!                      until the cancellation token fires
//! ```
//!
//! Each tick spawns its cycle instead of awaiting it, so a slow cycle makes
//! the following ticks hit the in-progress guard and return `Skipped`
//! rather than queue up. Shutdown stops both timers but never interrupts a
//! cycle that is already running.

use std::sync::Arc;
use std::time::Duration;

use shelf_core::{ConfigError, ScheduleConfig};
use shelf_scanner::Catalog;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::ScanController;
use crate::error::ScheduleError;

/// Owns the timers of a running importer.
///
/// Dropping the scheduler cancels its timers.
#[derive(Debug)]
pub struct Scheduler {
    cancellation_token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Starts the timers described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Config`] for a zero interval.
    pub fn start<C>(
        controller: Arc<ScanController<C>>,
        config: &ScheduleConfig,
    ) -> Result<Self, ScheduleError>
    where
        C: Catalog + 'static,
    {
        if config.interval_secs == 0 {
            return Err(ConfigError::invalid_option("schedule.interval_secs", "must be positive").into());
        }
        let startup = config.scan_on_start.then(|| config.startup_delay());
        Self::start_with(controller, config.interval(), startup)
    }

    /// Starts the timers with explicit timing.
    ///
    /// `startup_delay` of `None` disables the startup cycle; the first
    /// interval cycle then runs one `interval` after the call.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Config`] for a zero interval.
    pub fn start_with<C>(
        controller: Arc<ScanController<C>>,
        interval: Duration,
        startup_delay: Option<Duration>,
    ) -> Result<Self, ScheduleError>
    where
        C: Catalog + 'static,
    {
        if interval.is_zero() {
            return Err(ConfigError::invalid_option("interval", "must be positive").into());
        }

        let cancellation_token = CancellationToken::new();
        let mut tasks = Vec::with_capacity(2);

        controller.state().log().info(format!(
            "Watching {} every {}s",
            controller.processor().watch_config().watch_root,
            interval.as_secs_f64()
        ));

        if let Some(delay) = startup_delay {
            let controller = Arc::clone(&controller);
            let token = cancellation_token.clone();
            tasks.push(tokio::spawn(async move {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("Startup scan cancelled");
                        return;
                    }
                    () = tokio::time::sleep(delay) => {}
                }
                debug!("Running startup scan");
                controller.run_scan_cycle().await;
            }));
        }

        let token = cancellation_token.clone();
        tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("Interval timer cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            controller.run_scan_cycle().await;
                        });
                    }
                }
            }
        }));

        info!(interval_ms = interval.as_millis(), startup = startup_delay.is_some(), "Scheduler started");
        Ok(Self {
            cancellation_token,
            tasks,
        })
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) is called.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled()
    }

    /// Stops both timers. A cycle already in flight runs to completion.
    pub fn shutdown(&self) {
        if self.is_running() {
            info!("Scheduler shutting down");
            self.cancellation_token.cancel();
        }
    }

    /// Stops the timers and waits for them to finish.
    ///
    /// A pending startup cycle that already began is awaited as well.
    pub async fn join(mut self) {
        self.shutdown();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                debug!(error = %e, "Timer task ended abnormally");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
