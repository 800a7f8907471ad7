//! SQLite-backed store holding the document as one JSON row.

use super::{RawStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::document::Document;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens or creates the database file, applying container migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Schema version recorded with the last saved document.
    pub fn stored_schema_version(&self) -> StoreResult<Option<u32>> {
        let version = self
            .conn
            .query_row(
                "SELECT schema_version FROM documents WHERE id = 1;",
                [],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(version)
    }
}

impl RawStore for SqliteDocumentStore {
    fn load_raw(&mut self) -> StoreResult<Option<Value>> {
        let body = self
            .conn
            .query_row("SELECT body FROM documents WHERE id = 1;", [], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        match body {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(StoreError::Corrupt),
            None => Ok(None),
        }
    }

    fn save_raw(&mut self, doc: &Document) -> StoreResult<()> {
        let body = serde_json::to_string(doc).map_err(StoreError::Serialize)?;
        self.conn.execute(
            "INSERT INTO documents (id, body, schema_version, saved_at)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                schema_version = excluded.schema_version,
                saved_at = excluded.saved_at;",
            params![
                body,
                doc.version,
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            ],
        )?;
        Ok(())
    }
}
