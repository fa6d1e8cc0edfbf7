//! Field validation rules.
//!
//! These functions are the single source of truth for entity field limits.
//! They run at construction time (so an invalid `Entity` never exists) and
//! again on every store write path, with identical thresholds.

use crate::error::{CatalogError, Result};

/// Minimum name length in characters, after trimming.
pub const NAME_MIN_CHARS: usize = 3;

/// Maximum name length in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum description length in characters, after trimming.
pub const DESCRIPTION_MAX_CHARS: usize = 255;

/// Validate an entity name.
///
/// The name must be non-empty after trimming and its trimmed length must
/// fall within [`NAME_MIN_CHARS`], [`NAME_MAX_CHARS`]. Lengths are counted
/// in Unicode scalar values, not bytes.
pub fn validate_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_CHARS || len > NAME_MAX_CHARS {
        return Err(CatalogError::Validation(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        )));
    }
    Ok(())
}

/// Validate an optional entity description.
///
/// Absent descriptions are always valid. Present ones must not exceed
/// [`DESCRIPTION_MAX_CHARS`] after trimming.
pub fn validate_description(description: Option<&str>) -> Result<()> {
    if let Some(description) = description {
        if description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(CatalogError::Validation(format!(
                "Description must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    Ok(())
}

/// Validate both writable fields of an entity.
pub fn validate_fields(name: &str, description: Option<&str>) -> Result<()> {
    validate_name(name)?;
    validate_description(description)?;
    Ok(())
}
