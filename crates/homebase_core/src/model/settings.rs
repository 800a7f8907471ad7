//! Versioned settings singleton.

use crate::model::fields::Fields;
use crate::normalize::theme::resolve_theme;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Theme used when none is stored or the stored one is unknown.
pub const DEFAULT_THEME: &str = "midnight";
pub const DEFAULT_BACKUP_INTERVAL_DAYS: u32 = 7;
pub const MAX_BACKUP_INTERVAL_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Named theme, one of `normalize::theme::THEMES`.
    pub theme: String,
    pub data_dir: Option<String>,
    pub installer_completed: bool,
    /// Monday of the week the planner was last maintained for.
    pub week_start: Option<NaiveDate>,
    /// Action name -> accelerator overrides.
    pub keyboard_shortcuts: BTreeMap<String, String>,
    pub backup_enabled: bool,
    pub backup_interval_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            data_dir: None,
            installer_completed: false,
            week_start: None,
            keyboard_shortcuts: BTreeMap::new(),
            backup_enabled: false,
            backup_interval_days: DEFAULT_BACKUP_INTERVAL_DAYS,
        }
    }
}

impl Settings {
    pub(crate) fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = value else {
            return Self::default();
        };
        let fields = Fields::new(map, 0);

        let mut keyboard_shortcuts = BTreeMap::new();
        if let Some(Value::Object(overrides)) = fields.raw("keyboardShortcuts") {
            for (action, accelerator) in overrides {
                if let Value::String(accelerator) = accelerator {
                    let action = action.trim();
                    let accelerator = accelerator.trim();
                    if !action.is_empty() && !accelerator.is_empty() {
                        keyboard_shortcuts.insert(action.to_string(), accelerator.to_string());
                    }
                }
            }
        }

        Self {
            theme: resolve_theme(fields.raw("theme")),
            data_dir: fields.opt_string("dataDir"),
            installer_completed: fields.bool("installerCompleted"),
            week_start: fields.date("weekStart"),
            keyboard_shortcuts,
            backup_enabled: fields.bool("backupEnabled"),
            backup_interval_days: fields.u32_in(
                "backupIntervalDays",
                1,
                MAX_BACKUP_INTERVAL_DAYS,
                DEFAULT_BACKUP_INTERVAL_DAYS,
            ),
        }
    }
}
