//! Document property storage for the editing timer.
//!
//! Stands in for the custom properties a host application keeps inside each
//! document. Every document (identified by its full path) carries a set of
//! named numeric properties; the editing timer uses one of them,
//! [`ELAPSED_TIME_PROPERTY`], to persist total editing seconds.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Use one instance per thread or wrap it in a `Mutex`.
//!
//! # Schema
//!
//! `updated_at` is stored as TEXT in RFC 3339 format with millisecond
//! precision (e.g., `2024-01-15T10:30:00.000Z`).

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Name of the property holding total editing seconds.
pub const ELAPSED_TIME_PROPERTY: &str = "ElapsedTime";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

/// Stored editing time for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentElapsed {
    pub document: String,
    pub seconds: f64,
    pub updated_at: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema. Idempotent.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS document_properties (
                document TEXT NOT NULL,
                name TEXT NOT NULL,
                value REAL NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (document, name)
            );
            ",
        )?;
        Ok(())
    }

    /// Reads a numeric property, `None` if the document doesn't carry it.
    pub fn property(&self, document: &str, name: &str) -> Result<Option<f64>, DbError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM document_properties WHERE document = ? AND name = ?",
                params![document, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Writes a numeric property, creating it if necessary.
    pub fn set_property(&mut self, document: &str, name: &str, value: f64) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO document_properties (document, name, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(document, name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![document, name, value, format_timestamp(Utc::now())],
        )?;
        tracing::debug!(document, name, value, "stored document property");
        Ok(())
    }

    /// Stored editing seconds for `document`, if any.
    pub fn elapsed_seconds(&self, document: &str) -> Result<Option<f64>, DbError> {
        self.property(document, ELAPSED_TIME_PROPERTY)
    }

    pub fn set_elapsed_seconds(&mut self, document: &str, seconds: f64) -> Result<(), DbError> {
        self.set_property(document, ELAPSED_TIME_PROPERTY, seconds)
    }

    /// Lists stored editing time for every document, ordered by document.
    pub fn list_elapsed(&self) -> Result<Vec<DocumentElapsed>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT document, value, updated_at
            FROM document_properties
            WHERE name = ?
            ORDER BY document ASC
            ",
        )?;
        let rows = stmt.query_map([ELAPSED_TIME_PROPERTY], |row| {
            Ok(DocumentElapsed {
                document: row.get(0)?,
                seconds: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;
        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
