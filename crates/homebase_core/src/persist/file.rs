//! Whole-document JSON file store.
//!
//! Writes go to a sibling temp file that is then renamed over the target, so
//! readers see either the old or the new document.

use super::{RawStore, StoreError, StoreResult};
use crate::model::document::Document;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RawStore for JsonFileStore {
    fn load_raw(&mut self) -> StoreResult<Option<Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(StoreError::Corrupt)
    }

    fn save_raw(&mut self, doc: &Document) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
