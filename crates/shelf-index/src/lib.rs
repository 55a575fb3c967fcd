//! JSON-backed import index for comic-shelf.
//!
//! - [`JsonStore`] reads and atomically replaces a single JSON document
//! - [`ImportIndex`] maps archived folder names to catalog results
//! - [`extract_external_id`] and the link helpers derive entry fields

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod identifier;
pub mod index;
pub mod link;
pub mod store;

pub use document::{ImportIndexDocument, IndexEntry, IndexStats};
pub use error::StoreError;
pub use identifier::extract_external_id;
pub use index::ImportIndex;
pub use link::{encode_path, public_url, relative_storage_path};
pub use store::JsonStore;
