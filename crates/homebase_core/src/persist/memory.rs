//! Shared in-memory store.

use super::{RawStore, StoreError, StoreResult};
use crate::model::document::Document;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    value: Option<Value>,
    writes: usize,
    fail_writes: bool,
}

/// Store kept in memory. Clones share state, so a test can keep a handle
/// while the gateway owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `value`, as if a previous session saved it.
    pub fn with_value(value: Value) -> Self {
        let store = Self::new();
        store.lock().value = Some(value);
        store
    }

    pub fn value(&self) -> Option<Value> {
        self.lock().value.clone()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following `save_raw` fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RawStore for MemoryStore {
    fn load_raw(&mut self) -> StoreResult<Option<Value>> {
        Ok(self.lock().value.clone())
    }

    fn save_raw(&mut self, doc: &Document) -> StoreResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(StoreError::Unavailable("memory store write disabled".into()));
        }
        state.value = Some(serde_json::to_value(doc).map_err(StoreError::Serialize)?);
        state.writes += 1;
        Ok(())
    }
}
