//! Core engine for Homebase, an offline-first personal data store.
//! This crate is the single source of truth for the document shape and its
//! invariants; hosts only ever see canonical snapshots.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod maintenance;
pub mod model;
pub mod normalize;
pub mod ordering;
pub mod persist;
pub mod recurrence;
pub mod repo;
pub mod service;

pub use clock::{new_id, Clock, ManualClock, SystemClock};
pub use config::{StoreConfig, DEFAULT_DEBOUNCE_WINDOW};
pub use logging::{default_log_level, init_logging, logging_status};
pub use maintenance::{maintain, week_start_of};
pub use model::document::Document;
pub use model::entity::{Entity, EntityKind, Table};
pub use normalize::{normalize, normalize_document};
pub use persist::{
    JsonFileStore, MemoryStore, PersistenceGateway, RawStore, SqliteDocumentStore, StoreError,
    StoreResult,
};
pub use recurrence::{agenda, expand, Occurrence};
pub use repo::{RepoError, RepoResult, Repository};
pub use service::store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
