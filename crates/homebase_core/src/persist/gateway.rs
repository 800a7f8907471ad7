//! Debounced write scheduler in front of a `RawStore`.
//!
//! # Responsibility
//! - Run the startup load path: raw load, normalize, weekly maintenance.
//! - Collapse rapid saves into one write of the latest document.
//! - Keep the last write failure observable without rolling anything back.
//!
//! # Invariants
//! - At most one write is pending; a newer `save` supersedes it.
//! - Writes happen in call order; only the most recent document is written.
//! - The gateway never reads a clock. Callers pass `now`, so the debounce is
//!   deterministic under test.

use super::{RawStore, StoreError};
use crate::maintenance::maintain;
use crate::model::document::Document;
use crate::normalize::normalize;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

struct PendingWrite {
    doc: Arc<Document>,
    due: DateTime<Utc>,
}

pub struct PersistenceGateway<S: RawStore> {
    store: S,
    window: chrono::Duration,
    pending: Option<PendingWrite>,
    last_error: Option<StoreError>,
}

impl<S: RawStore> PersistenceGateway<S> {
    pub fn new(store: S, window: Duration) -> Self {
        Self {
            store,
            window: chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::zero()),
            pending: None,
            last_error: None,
        }
    }

    /// Loads the canonical document for a new session.
    ///
    /// Any load failure is treated as "no prior document". When weekly
    /// maintenance changes the document, a write is scheduled at `now`.
    pub fn load(&mut self, now: DateTime<Utc>, today: NaiveDate) -> Document {
        let raw = match self.store.load_raw() {
            Ok(Some(raw)) => {
                info!("event=store_load module=persist status=ok source=stored");
                raw
            }
            Ok(None) => {
                info!("event=store_load module=persist status=ok source=empty");
                Value::Null
            }
            Err(err) => {
                warn!(
                    "event=store_load module=persist status=recovered error_code={} error={}",
                    err.code(),
                    err
                );
                Value::Null
            }
        };

        let (doc, changed) = maintain(normalize(&raw), today);
        if changed {
            self.save(Arc::new(doc.clone()), now);
        }
        doc
    }

    /// Schedules `doc` to be written once the debounce window has passed.
    pub fn save(&mut self, doc: Arc<Document>, now: DateTime<Utc>) {
        if self.pending.is_some() {
            debug!("event=persist_debounce module=persist status=superseded");
        }
        self.pending = Some(PendingWrite {
            doc,
            due: now + self.window,
        });
    }

    /// Writes the pending document if its deadline has passed. Returns
    /// whether a write was attempted.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let due = self.pending.as_ref().is_some_and(|pending| pending.due <= now);
        if !due {
            return false;
        }
        self.flush();
        true
    }

    /// Writes the pending document immediately, if any. Returns `false` when
    /// the write failed; the error is kept in `last_error`.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return true;
        };
        match self.store.save_raw(&pending.doc) {
            Ok(()) => {
                info!(
                    "event=persist_write module=persist status=ok version={}",
                    pending.doc.version
                );
                self.last_error = None;
                true
            }
            Err(err) => {
                error!(
                    "event=persist_write module=persist status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Drops the pending write without executing it.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            debug!("event=persist_debounce module=persist status=cancelled");
        }
        cancelled
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_due(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Failure of the most recent write, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<StoreError> {
        self.last_error.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
