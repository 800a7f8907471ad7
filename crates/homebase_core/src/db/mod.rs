//! SQLite container for the serialized document.
//!
//! # Responsibility
//! - Open and configure the connection behind `SqliteDocumentStore`.
//! - Bring the container tables up to date before any document is touched.
//!
//! # Invariants
//! - The container version lives in `PRAGMA user_version` and is independent
//!   of the document's own `version` field.
//! - A container written by a newer binary is never opened.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The container was migrated by a newer binary.
    NewerContainer { found: u32, supported: u32 },
}

impl DbError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::NewerContainer { .. } => "db_newer_container",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::NewerContainer { found, supported } => write!(
                f,
                "document container is at version {found}, this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NewerContainer { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
