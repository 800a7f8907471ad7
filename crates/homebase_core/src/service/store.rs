//! Store facade: snapshot, working copies and debounced persistence.
//!
//! # Responsibility
//! - Load the canonical document on open (normalize plus weekly maintenance).
//! - Run each mutation against a private working copy and publish it as the
//!   next immutable snapshot.
//! - Hand every published snapshot to the persistence gateway.
//!
//! # Invariants
//! - Readers only ever see canonical snapshots; a failed mutation publishes
//!   nothing.
//! - A mutation that leaves the document unchanged schedules no write.
//! - A write failure never rolls back the in-memory snapshot.
//!
//! # See also
//! - `persist::gateway` for the debounce contract.
//! - `repo` for the operations available inside `mutate`.

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::maintenance::maintain;
use crate::model::document::Document;
use crate::normalize::{normalize, normalize_document};
use crate::persist::{PersistenceGateway, RawStore, StoreError, StoreResult};
use crate::recurrence::{agenda, Occurrence};
use crate::repo::{RepoResult, Repository};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

/// Application-facing handle over one persisted document.
pub struct Store<S: RawStore, C: Clock> {
    gateway: PersistenceGateway<S>,
    clock: C,
    snapshot: Arc<Document>,
}

impl<S: RawStore, C: Clock> Store<S, C> {
    /// Opens `store`, recovering to an empty document when it holds nothing
    /// usable.
    pub fn open(store: S, clock: C, config: &StoreConfig) -> Self {
        let mut gateway = PersistenceGateway::new(store, config.debounce_window);
        let doc = gateway.load(clock.now(), clock.today());
        info!(
            "event=store_open module=service status=ok version={} cards={} events={}",
            doc.version,
            doc.cards.len(),
            doc.calendar_events.len()
        );
        Self {
            gateway,
            clock,
            snapshot: Arc::new(doc),
        }
    }

    /// Current canonical snapshot. Cheap to clone and safe to keep.
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.snapshot)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Applies `op` to a working copy of the snapshot.
    ///
    /// # Contract
    /// - `Ok`: the working copy is normalized, published and scheduled for
    ///   persistence when it differs from the previous snapshot.
    /// - `Err`: the working copy is dropped and the snapshot is untouched.
    pub fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut Repository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut working = Document::clone(&self.snapshot);
        let value = {
            let mut repo = Repository::new(&mut working, self.clock.now());
            match op(&mut repo) {
                Ok(value) => value,
                Err(err) => {
                    debug!("event=mutation_rejected module=service status=discarded error={err}");
                    return Err(err);
                }
            }
        };
        self.publish(normalize_document(&working));
        Ok(value)
    }

    /// Replaces the whole document with `raw`, for imports.
    ///
    /// The input goes through the same path as a startup load, so anything
    /// the normalizer accepts is accepted here.
    pub fn replace_document(&mut self, raw: &Value) {
        let (doc, _) = maintain(normalize(raw), self.clock.today());
        info!("event=document_replace module=service status=ok");
        self.publish(doc);
    }

    /// Runs weekly maintenance against the current date. Returns whether any
    /// card was purged or the week marker moved.
    pub fn run_maintenance(&mut self) -> bool {
        let (doc, changed) = maintain(Document::clone(&self.snapshot), self.clock.today());
        if changed {
            self.publish(doc);
        }
        changed
    }

    /// Occurrences of all calendar events inside `[start, end]`.
    pub fn occurrences(&self, start: NaiveDate, end: NaiveDate) -> Vec<Occurrence> {
        agenda(&self.snapshot.calendar_events, start, end)
    }

    /// Writes the pending snapshot if its debounce window has elapsed.
    pub fn tick(&mut self) -> bool {
        self.gateway.poll(self.clock.now())
    }

    /// Writes the pending snapshot now. Returns `false` when the write failed.
    pub fn flush(&mut self) -> bool {
        self.gateway.flush()
    }

    pub fn has_pending_write(&self) -> bool {
        self.gateway.has_pending()
    }

    /// Failure of the most recent write, if it has not succeeded since.
    pub fn persistence_error(&self) -> Option<&StoreError> {
        self.gateway.last_error()
    }

    /// Flushes and releases the underlying store.
    ///
    /// # Errors
    /// - The final write failed; the snapshot is lost with the store handle.
    pub fn close(mut self) -> StoreResult<S> {
        self.gateway.flush();
        if let Some(err) = self.gateway.take_last_error() {
            warn!(
                "event=store_close module=service status=error error_code={}",
                err.code()
            );
            return Err(err);
        }
        info!("event=store_close module=service status=ok");
        Ok(self.gateway.into_store())
    }

    fn publish(&mut self, doc: Document) {
        if doc == *self.snapshot {
            debug!("event=mutation_applied module=service status=unchanged");
            return;
        }
        self.snapshot = Arc::new(doc);
        self.gateway.save(Arc::clone(&self.snapshot), self.clock.now());
    }
}
