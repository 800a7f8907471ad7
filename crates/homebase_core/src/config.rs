//! Engine configuration.

use crate::logging::{default_log_level, init_logging};
use std::path::Path;
use std::time::Duration;

/// Debounce window applied when no other is configured.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Tunables for one `Store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Quiet period after the last mutation before the document is written.
    pub debounce_window: Duration,
    /// Level used by `StoreConfig::init_logging`.
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            log_level: default_log_level().to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Starts file logging under `log_dir` at the configured level.
    pub fn init_logging(&self, log_dir: impl AsRef<Path>) -> Result<(), String> {
        init_logging(&self.log_level, log_dir)
    }
}
