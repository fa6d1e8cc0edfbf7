//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::validate::{validate_description, validate_fields, validate_name};

/// A persisted entity.
///
/// `name` and `description` are kept private so every mutation goes through
/// the validating setters; a value that violates the field rules cannot be
/// constructed or produced by mutation. Timestamps are owned by the storage
/// layer: `created_at` is set once, `updated_at` is refreshed on every
/// successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entity {
    /// Assemble an entity from already-persisted parts.
    ///
    /// Used by storage backends when hydrating rows; fields are still
    /// validated so a corrupt row surfaces as an error instead of an
    /// invariant-breaking value.
    pub fn from_parts(
        id: Uuid,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_fields(&name, description.as_deref())?;
        Ok(Self {
            id,
            name,
            description,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the name, rejecting values outside the field rules.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replace the description, rejecting values outside the field rules.
    pub fn set_description(&mut self, description: Option<String>) -> Result<()> {
        validate_description(description.as_deref())?;
        self.description = description;
        Ok(())
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// A validated candidate for insertion.
///
/// Construction fails if the fields violate the validation rules, so an
/// invalid `NewEntity` never exists. Identity and timestamps are assigned
/// by the store on `add`.
#[derive(Debug, Clone)]
pub struct NewEntity {
    name: String,
    description: Option<String>,
}

impl NewEntity {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Result<Self> {
        let name = name.into();
        validate_fields(&name, description.as_deref())?;
        Ok(Self { name, description })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ordering column for `search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive lexical order on `name` (the default).
    #[default]
    Name,
    /// Chronological order on `created_at`.
    CreatedAt,
}

/// Categorical filter on the name column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFilter {
    /// The full name consists of ASCII letters only.
    LettersOnly,
}

/// Filter and ordering for querying entities.
///
/// The same query drives both `search` and `get_count`, so page counts
/// computed from `get_count` always agree with paged `search` results.
/// All active conditions are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
    /// Case-insensitive substring match against name or description.
    pub term: Option<String>,

    /// Categorical filter on the name.
    pub name_filter: Option<NameFilter>,

    /// Lower bound on `created_at` (inclusive).
    pub since: Option<DateTime<Utc>>,

    /// Upper bound on `created_at` (inclusive).
    pub until: Option<DateTime<Utc>>,

    /// Ordering column; ignored by `get_count`.
    pub sort: SortKey,

    /// Ordering direction; defaults to descending when false.
    pub descending: bool,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn letters_only(mut self) -> Self {
        self.name_filter = Some(NameFilter::LettersOnly);
        self
    }

    pub fn since(mut self, date: DateTime<Utc>) -> Self {
        self.since = Some(date);
        self
    }

    pub fn until(mut self, date: DateTime<Utc>) -> Self {
        self.until = Some(date);
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_validates_on_construction() {
        let entity = NewEntity::new("Apple", Some("sweet fruit".to_string())).unwrap();
        assert_eq!(entity.name(), "Apple");
        assert_eq!(entity.description(), Some("sweet fruit"));

        assert!(NewEntity::new("ab", None).is_err());
        assert!(NewEntity::new("Apple", Some("x".repeat(256))).is_err());
    }

    #[test]
    fn test_entity_setters_validate() {
        let now = Utc::now();
        let mut entity =
            Entity::from_parts(Uuid::new_v4(), "Apple".to_string(), None, now, now).unwrap();

        assert!(entity.set_name("ab").is_err());
        assert_eq!(entity.name(), "Apple");

        entity.set_name("Banana").unwrap();
        assert_eq!(entity.name(), "Banana");

        assert!(entity.set_description(Some("x".repeat(256))).is_err());
        entity.set_description(Some("yellow".to_string())).unwrap();
        assert_eq!(entity.description(), Some("yellow"));
    }

    #[test]
    fn test_from_parts_rejects_invalid_rows() {
        let now = Utc::now();
        assert!(Entity::from_parts(Uuid::new_v4(), "x".to_string(), None, now, now).is_err());
    }

    #[test]
    fn test_query_builder() {
        let now = Utc::now();
        let query = EntityQuery::new()
            .term("sweet")
            .letters_only()
            .since(now)
            .sort(SortKey::CreatedAt)
            .descending();

        assert_eq!(query.term, Some("sweet".to_string()));
        assert_eq!(query.name_filter, Some(NameFilter::LettersOnly));
        assert_eq!(query.since, Some(now));
        assert_eq!(query.until, None);
        assert_eq!(query.sort, SortKey::CreatedAt);
        assert!(query.descending);
    }

    #[test]
    fn test_query_defaults() {
        let query = EntityQuery::new();
        assert_eq!(query.sort, SortKey::Name);
        assert!(!query.descending);
        assert!(query.term.is_none());
        assert!(query.name_filter.is_none());
    }
}
