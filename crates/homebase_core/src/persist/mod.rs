//! Persistence boundary: raw stores and the debounced write gateway.
//!
//! # Responsibility
//! - Define the two primitives the engine needs from its host
//!   (`load_raw` / `save_raw`) as the `RawStore` trait.
//! - Provide in-memory, JSON file and SQLite implementations.
//! - Collapse bursts of saves into one write (`PersistenceGateway`).
//!
//! # Invariants
//! - A store always writes the whole document, replacing the previous one.
//! - `load_raw` returns `Ok(None)` when nothing was ever saved.

use crate::db::DbError;
use crate::model::document::Document;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
mod gateway;
mod memory;
mod sqlite;

pub use file::JsonFileStore;
pub use gateway::PersistenceGateway;
pub use memory::MemoryStore;
pub use sqlite::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage primitives consumed by the engine.
pub trait RawStore {
    /// Last persisted document verbatim, or `None` if there is none.
    fn load_raw(&mut self) -> StoreResult<Option<Value>>;

    /// Durably replaces the persisted document.
    fn save_raw(&mut self, doc: &Document) -> StoreResult<()>;
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Stored bytes are not a JSON document.
    Corrupt(serde_json::Error),
    Serialize(serde_json::Error),
    Db(DbError),
    /// The backend refused the operation.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store i/o failed: {err}"),
            Self::Corrupt(err) => write!(f, "stored document is corrupt: {err}"),
            Self::Serialize(err) => write!(f, "document serialization failed: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(err) | Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl StoreError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "store_io",
            Self::Corrupt(_) => "store_corrupt",
            Self::Serialize(_) => "store_serialize",
            Self::Db(err) => err.code(),
            Self::Unavailable(_) => "store_unavailable",
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
