//! # Catalog Core
//!
//! Core library for Catalog - a validated, searchable store for named records.
//!
//! This crate provides the data model, validation rules, and storage layer
//! independent of any user interface.
//!
//! ## Architecture
//!
//! - **validate**: field validation rules and limits
//! - **storage**: the `EntityStore` contract and its SQLite implementation
//! - **error**: error taxonomy shared across the crate

pub mod error;
pub mod storage;
pub mod validate;

pub use error::{CatalogError, Result};
pub use storage::{Entity, EntityQuery, EntityStore, NameFilter, NewEntity, SortKey, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
