//! Numbered schema migration chain for raw documents.
//!
//! # Responsibility
//! - Register raw-shape migrations in strictly increasing order.
//! - Bring a raw document from its stored version to `latest_version()`.
//!
//! # Invariants
//! - Step `N` takes a version `N-1` shape to version `N`; steps never fail.
//! - `version` values must remain monotonic.
//! - Documents that claim a newer version than this binary skip migration and
//!   are revived as-is.

use crate::normalize::theme::resolve_theme;
use log::info;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "split_legacy_shortcuts",
        apply: split_legacy_shortcuts,
    },
    Migration {
        version: 2,
        name: "named_theme",
        apply: named_theme,
    },
    Migration {
        version: 3,
        name: "card_location_object",
        apply: card_location_object,
    },
    Migration {
        version: 4,
        name: "event_recurrence_object",
        apply: event_recurrence_object,
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Version stamped on a raw document; anything unreadable counts as 0.
pub fn raw_version(root: &Map<String, Value>) -> u32 {
    root.get("version")
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Applies every pending migration and returns the versions that ran.
pub fn apply_migrations(root: &mut Map<String, Value>) -> Vec<u32> {
    let current_version = raw_version(root);
    let mut applied = Vec::new();

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        (migration.apply)(root);
        root.insert("version".to_string(), Value::from(migration.version));
        applied.push(migration.version);
        info!(
            "event=schema_migrate module=normalize status=ok version={} name={}",
            migration.version, migration.name
        );
    }

    applied
}

/// Runs exactly one step regardless of the stored version.
///
/// Returns `false` when no step has that version.
pub fn apply_step(version: u32, root: &mut Map<String, Value>) -> bool {
    match MIGRATIONS.iter().find(|migration| migration.version == version) {
        Some(migration) => {
            (migration.apply)(root);
            root.insert("version".to_string(), Value::from(migration.version));
            true
        }
        None => false,
    }
}

fn append_array(root: &mut Map<String, Value>, key: &str, values: Vec<Value>) {
    match root.get_mut(key) {
        Some(Value::Array(items)) => items.extend(values),
        _ => {
            root.insert(key.to_string(), Value::Array(values));
        }
    }
}

fn first_string<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
}

/// Shape of one record in the legacy union `shortcuts` collection.
enum LegacyShortcut {
    Link(Map<String, Value>),
    Path(Map<String, Value>),
    Clipboard(Map<String, Value>),
    Unsupported,
}

impl LegacyShortcut {
    fn decode(value: Value) -> Self {
        let Value::Object(item) = value else {
            return Self::Unsupported;
        };
        let kind = item
            .get("type")
            .or_else(|| item.get("kind"))
            .and_then(Value::as_str)
            .map(|value| value.trim().to_ascii_lowercase());
        match kind.as_deref() {
            None | Some("link") | Some("url") | Some("app") | Some("shortcut") => Self::Link(item),
            Some("path") | Some("folder") | Some("file") => Self::Path(item),
            Some("clipboard") | Some("snippet") => Self::Clipboard(item),
            Some(_) => Self::Unsupported,
        }
    }
}

fn split_legacy_shortcuts(root: &mut Map<String, Value>) {
    let legacy = match root.remove("shortcuts") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let mut links = Vec::new();
    let mut paths = Vec::new();
    let mut clips = Vec::new();
    for value in legacy {
        match LegacyShortcut::decode(value) {
            LegacyShortcut::Link(mut item) => {
                item.remove("type");
                item.remove("kind");
                if !item.contains_key("target") {
                    if let Some(url) = item.remove("url") {
                        item.insert("target".to_string(), url);
                    }
                }
                links.push(Value::Object(item));
            }
            LegacyShortcut::Path(item) => {
                let Some(path) = first_string(&item, &["path", "target", "url"]) else {
                    continue;
                };
                let mut entry = Map::new();
                entry.insert("id".to_string(), item.get("id").cloned().unwrap_or(Value::Null));
                entry.insert("name".to_string(), item.get("name").cloned().unwrap_or(Value::Null));
                entry.insert("path".to_string(), Value::from(path));
                entry.insert("order".to_string(), item.get("order").cloned().unwrap_or(Value::Null));
                paths.push(Value::Object(entry));
            }
            LegacyShortcut::Clipboard(item) => {
                let Some(content) = first_string(&item, &["content", "text", "value", "target"])
                else {
                    continue;
                };
                let mut entry = Map::new();
                entry.insert("id".to_string(), item.get("id").cloned().unwrap_or(Value::Null));
                entry.insert("content".to_string(), Value::from(content));
                entry.insert(
                    "categoryId".to_string(),
                    item.get("categoryId").cloned().unwrap_or(Value::Null),
                );
                entry.insert(
                    "createdAt".to_string(),
                    item.get("createdAt").cloned().unwrap_or(Value::Null),
                );
                clips.push(Value::Object(entry));
            }
            LegacyShortcut::Unsupported => {}
        }
    }

    root.insert("shortcuts".to_string(), Value::Array(links));
    append_array(root, "paths", paths);
    append_array(root, "clipboardItems", clips);
}

fn named_theme(root: &mut Map<String, Value>) {
    let top_level = root.remove("theme");
    let settings = root
        .entry("settings".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !settings.is_object() {
        *settings = Value::Object(Map::new());
    }
    let Value::Object(settings) = settings else {
        return;
    };

    let stored = settings.get("theme").cloned().filter(|value| !value.is_null());
    let source = stored.or(top_level);
    if let Some(source) = source {
        settings.insert("theme".to_string(), Value::from(resolve_theme(Some(&source))));
    }
}

fn card_location_object(root: &mut Map<String, Value>) {
    let Some(Value::Array(cards)) = root.get_mut("cards") else {
        return;
    };
    for card in cards.iter_mut() {
        let Value::Object(card) = card else {
            continue;
        };
        if card.get("location").is_some_and(Value::is_object) {
            continue;
        }
        let day = card.remove("day").unwrap_or(Value::Null);
        let period = card.remove("period").unwrap_or(Value::Null);
        let mut location = Map::new();
        location.insert("day".to_string(), day);
        location.insert("period".to_string(), period);
        card.insert("location".to_string(), Value::Object(location));
    }
}

fn event_recurrence_object(root: &mut Map<String, Value>) {
    let Some(Value::Array(events)) = root.get_mut("calendarEvents") else {
        return;
    };
    for event in events.iter_mut() {
        let Value::Object(event) = event else {
            continue;
        };

        if !event.contains_key("startTime") {
            if let Some(time) = event.remove("time") {
                event.insert("startTime".to_string(), time);
            }
        }

        let repeat = event.remove("repeat");
        let interval = event.remove("repeatInterval");
        let until = event.remove("repeatUntil");
        if !event.get("recurrence").is_some_and(Value::is_object) {
            let recurrence = match repeat {
                Some(Value::String(frequency)) => {
                    let mut recurrence = Map::new();
                    recurrence.insert("frequency".to_string(), Value::from(frequency));
                    recurrence.insert("interval".to_string(), interval.unwrap_or(Value::from(1)));
                    recurrence.insert("until".to_string(), until.unwrap_or(Value::Null));
                    Value::Object(recurrence)
                }
                _ => Value::Null,
            };
            event.insert("recurrence".to_string(), recurrence);
        }

        let minutes = event.remove("reminderMinutes");
        if !event.get("reminder").is_some_and(Value::is_object) {
            let reminder = match minutes {
                Some(Value::Number(minutes)) => {
                    let mut reminder = Map::new();
                    reminder.insert("enabled".to_string(), Value::Bool(true));
                    reminder.insert("offsetMinutes".to_string(), Value::Number(minutes));
                    Value::Object(reminder)
                }
                _ => Value::Null,
            };
            event.insert("reminder".to_string(), reminder);
        }
    }
}
