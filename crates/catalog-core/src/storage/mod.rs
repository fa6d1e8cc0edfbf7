//! Storage layer.
//!
//! The storage layer mediates all reads and writes of entities. The
//! `EntityStore` trait defines the access contract; `SqliteStore` is its
//! SQLite-backed implementation.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::EntityStore;
pub use types::{Entity, EntityQuery, NameFilter, NewEntity, SortKey};
