//! Core types, configuration, and path validation for comic-shelf.
//!
//! This crate provides the foundational pieces used across the workspace:
//!
//! - [`Config`] and its sections, loaded from a JSON document
//! - [`ConfigError`] for configuration failures
//! - Path normalization and validation for the catalog import API
//! - Domain types (`Metadata`, `ImportOptions`, `ItemId`, `ImportResult`)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod path;
pub mod types;

pub use config::{Config, ExtensionSet, IndexConfig, LogConfig, ScheduleConfig, WatchConfig};
pub use error::ConfigError;
pub use path::{PathRejection, normalize, validate};
pub use types::{ImportOptions, ImportOptionsBuilder, ImportResult, ItemId, Metadata};
