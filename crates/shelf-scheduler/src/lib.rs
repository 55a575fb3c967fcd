//! Scan cycle controller and timers for comic-shelf.
//!
//! A host wires the importer up in three steps:
//!
//! ```ignore
//! let config = Config::from_file(path)?;
//! let controller = Arc::new(ScanController::new(my_catalog, &config));
//! let scheduler = Scheduler::start(Arc::clone(&controller), &config.schedule)?;
//! // ... on shutdown
//! scheduler.join().await;
//! ```
//!
//! [`ScanState`] exposes the counters and the activity log for display.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod schedule;
pub mod state;

pub use controller::{CycleOutcome, ScanController};
pub use error::ScheduleError;
pub use schedule::Scheduler;
pub use state::{ScanGuard, ScanState};
