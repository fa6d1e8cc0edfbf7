//! Error types for Catalog core operations.
//!
//! Errors are descriptive at the core level; callers (CLI, UI) map them
//! to user-friendly messages. Validation errors are always raised before
//! any storage mutation; storage errors propagate unchanged.

use thiserror::Error;

/// Result type alias for Catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Core error type for Catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A field invariant was violated on construction or write
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation addressed a nonexistent record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}
