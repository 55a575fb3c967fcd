//! Folder discovery, catalog import and archiving for comic-shelf.
//!
//! This crate processes the item folders found under a watch root:
//!
//! - [`FolderWalker`] lists candidate folders and importable files
//! - [`FolderProcessor`] imports each file through a host [`Catalog`],
//!   records it in the import index and archives the folder
//! - [`FolderMover`] moves a folder, falling back to copy-and-delete
//! - [`ActivityLog`] and [`ImportStats`] expose progress to the host

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod activity;
pub mod catalog;
pub mod error;
pub mod folder;
pub mod mover;
pub mod processor;
pub mod stats;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use activity::{ActivityEntry, ActivityLevel, ActivityLog, DEFAULT_CAPACITY};
pub use catalog::{Catalog, CatalogItem};
pub use error::{CatalogError, MoveError, ScanError};
pub use folder::WatchFolder;
pub use mover::{FolderMover, MoveOutcome, MoveReport};
pub use processor::{FolderOutcome, FolderProcessor};
pub use stats::{ImportStats, StatsSnapshot};
pub use walker::{FileList, FolderWalker};
