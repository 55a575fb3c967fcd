//! Domain types for comic-shelf.
//!
//! - [`Metadata`] - The sidecar document describing an item folder
//! - [`ItemId`], [`ImportOptions`] and [`ImportResult`] - Catalog item
//!   identifiers, import options and per-file results
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use shelf_core::{ImportOptions, ItemId, Metadata};
//! ```

mod import;
mod metadata;

pub use import::{ImportOptions, ImportOptionsBuilder, ImportResult, ItemId};
pub use metadata::Metadata;
