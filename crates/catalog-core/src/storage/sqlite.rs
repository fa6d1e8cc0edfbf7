//! SQLite storage backend.
//!
//! Entities live in a single `entities` table. Timestamps are stored as
//! fixed-width RFC 3339 UTC strings (nanosecond precision, `Z` suffix) so
//! that string comparison in SQL equals chronological comparison, both for
//! the date-range predicate and for `ORDER BY created_at`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, ToSql};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::storage::traits::EntityStore;
use crate::storage::types::{Entity, EntityQuery, NameFilter, NewEntity, SortKey};
use crate::validate::validate_fields;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, name, description, created_at, updated_at FROM entities";

/// SQLite-backed entity store.
///
/// Each call locks the connection, performs a single statement, and releases
/// the lock on every exit path. No state is cached between calls; isolation
/// and atomicity are SQLite's.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// The schema is created idempotently, so opening an existing database
    /// is safe.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Self::sqlite_error)?;
        Self::initialize(conn)
    }

    /// Open an in-memory store. Useful for tests and scratch sessions;
    /// contents are lost when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Self::sqlite_error)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(Self::sqlite_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn sqlite_error(err: rusqlite::Error) -> CatalogError {
        CatalogError::Storage(format!("SQLite error: {}", err))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Storage("SQLite connection poisoned".to_string()))
    }

    fn format_ts(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| CatalogError::Storage(format!("Invalid timestamp: {}", e)))
    }

    fn entity_from_row(
        id_str: String,
        name: String,
        description: Option<String>,
        created_at_str: String,
        updated_at_str: String,
    ) -> Result<Entity> {
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| CatalogError::Storage(format!("Invalid UUID: {}", e)))?;
        let created_at = Self::parse_ts(&created_at_str)?;
        let updated_at = Self::parse_ts(&updated_at_str)?;
        Entity::from_parts(id, name, description, created_at, updated_at)
    }

    /// Escape `LIKE` metacharacters so the search term matches literally.
    fn escape_like(term: &str) -> String {
        let mut escaped = String::with_capacity(term.len());
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Build the WHERE conditions shared by `search` and `get_count`.
    ///
    /// All active conditions are conjunctive; an empty query matches every
    /// row.
    fn predicate(query: &EntityQuery) -> (Vec<String>, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(term) = query.term.as_deref() {
            let trimmed = term.trim();
            if !trimmed.is_empty() {
                // LIKE is case-insensitive for ASCII in SQLite. NULL
                // descriptions fall out of the OR on their own.
                let pattern = format!("%{}%", Self::escape_like(trimmed));
                conditions.push(
                    r"(name LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\')".to_string(),
                );
                params.push(Box::new(pattern.clone()));
                params.push(Box::new(pattern));
            }
        }

        if let Some(NameFilter::LettersOnly) = query.name_filter {
            // Full-string match: no character outside A-Za-z, and non-empty.
            conditions
                .push("(length(name) > 0 AND name NOT GLOB '*[^A-Za-z]*')".to_string());
        }

        if let Some(since) = query.since {
            conditions.push("created_at >= ?".to_string());
            params.push(Box::new(Self::format_ts(since)));
        }

        if let Some(until) = query.until {
            conditions.push("created_at <= ?".to_string());
            params.push(Box::new(Self::format_ts(until)));
        }

        (conditions, params)
    }

    fn order_clause(query: &EntityQuery) -> String {
        let direction = if query.descending { "DESC" } else { "ASC" };
        match query.sort {
            SortKey::Name => format!("name COLLATE NOCASE {}", direction),
            SortKey::CreatedAt => format!("created_at {}", direction),
        }
    }

    fn collect_entities(
        conn: &Connection,
        sql: &str,
        params: &[Box<dyn ToSql>],
    ) -> Result<Vec<Entity>> {
        let mut stmt = conn.prepare(sql).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(Self::sqlite_error)?;

        let mut entities = Vec::new();
        for row in rows {
            let (id_str, name, description, created_at_str, updated_at_str) =
                row.map_err(Self::sqlite_error)?;
            entities.push(Self::entity_from_row(
                id_str,
                name,
                description,
                created_at_str,
                updated_at_str,
            )?);
        }

        Ok(entities)
    }
}

impl EntityStore for SqliteStore {
    fn add(&self, entity: &NewEntity) -> Result<Entity> {
        validate_fields(entity.name(), entity.description())?;

        let conn = self.lock()?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO entities (id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                entity.name(),
                entity.description(),
                Self::format_ts(now),
                Self::format_ts(now),
            ),
        )
        .map_err(Self::sqlite_error)?;

        Entity::from_parts(
            id,
            entity.name().to_string(),
            entity.description().map(str::to_string),
            now,
            now,
        )
    }

    fn update(&self, entity: &mut Entity) -> Result<bool> {
        validate_fields(entity.name(), entity.description())?;

        let conn = self.lock()?;
        let now = Utc::now();

        let affected = conn
            .execute(
                "UPDATE entities SET name = ?, description = ?, updated_at = ? WHERE id = ?",
                (
                    entity.name(),
                    entity.description(),
                    Self::format_ts(now),
                    entity.id().to_string(),
                ),
            )
            .map_err(Self::sqlite_error)?;

        if affected == 0 {
            return Ok(false);
        }
        entity.touch(now);
        Ok(true)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM entities WHERE id = ?", [id.to_string()])
            .map_err(Self::sqlite_error)?;
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<Entity>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );

        match result {
            Ok((id_str, name, description, created_at_str, updated_at_str)) => {
                Ok(Some(Self::entity_from_row(
                    id_str,
                    name,
                    description,
                    created_at_str,
                    updated_at_str,
                )?))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Self::sqlite_error(e)),
        }
    }

    fn get_all(&self) -> Result<Vec<Entity>> {
        let conn = self.lock()?;
        let sql = format!("{} ORDER BY name COLLATE NOCASE ASC", SELECT_COLUMNS);
        Self::collect_entities(&conn, &sql, &[])
    }

    fn search(&self, query: &EntityQuery, page: usize, page_size: usize) -> Result<Vec<Entity>> {
        let conn = self.lock()?;

        let (conditions, mut params) = Self::predicate(query);
        let mut sql = String::from(SELECT_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&Self::order_clause(query));
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Box::new(page_size as i64));
        params.push(Box::new((page * page_size) as i64));

        Self::collect_entities(&conn, &sql, &params)
    }

    fn get_count(&self, query: &EntityQuery) -> Result<usize> {
        let conn = self.lock()?;

        let (conditions, params) = Self::predicate(query);
        let mut sql = String::from("SELECT COUNT(*) FROM entities");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let count: i64 = conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                row.get(0)
            })
            .map_err(Self::sqlite_error)?;

        Ok(count as usize)
    }
}
