//! Schema normalizer: arbitrary raw input to a canonical `Document`.
//!
//! # Responsibility
//! - Run the numbered migration chain on the raw shape.
//! - Revive every collection record by record, substituting defaults.
//! - Repair cross-collection references.
//!
//! # Invariants
//! - `normalize` is total: any JSON value yields a document.
//! - `normalize(serialize(normalize(x))) == normalize(x)`.
//! - Output is always stamped with `latest_version()`.
//!
//! # See also
//! - `migrations` for the raw-shape steps.
//! - `model::fields` for the per-field coercion rules.

pub mod migrations;
pub mod theme;

mod integrity;

use crate::model::document::Document;
use crate::model::entity::{Entity, Table};
use crate::model::fields::Fields;
use crate::model::settings::Settings;
use log::{error, info, warn};
use migrations::{apply_migrations, latest_version, raw_version};
use serde_json::{Map, Value};

/// Produces a canonical document from any raw value.
///
/// Non-object input is treated as an empty document. Records that cannot be
/// revived are dropped individually; other collections are unaffected.
pub fn normalize(raw: &Value) -> Document {
    let mut root = match raw {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    let stored_version = raw_version(&root);
    if stored_version > latest_version() {
        warn!(
            "event=schema_migrate module=normalize status=skipped stored_version={} latest_version={}",
            stored_version,
            latest_version()
        );
    } else {
        apply_migrations(&mut root);
    }

    let mut dropped = Dropped::default();
    let mut doc = Document {
        version: latest_version(),
        settings: Settings::from_value(root.get("settings")),
        cards: revive_table(&root, &mut dropped),
        calendar_events: revive_table(&root, &mut dropped),
        shortcut_folders: revive_table(&root, &mut dropped),
        shortcuts: revive_table(&root, &mut dropped),
        paths: revive_table(&root, &mut dropped),
        clipboard_categories: revive_table(&root, &mut dropped),
        clipboard_items: revive_table(&root, &mut dropped),
        note_folders: revive_table(&root, &mut dropped),
        notes: revive_table(&root, &mut dropped),
        projects: revive_table(&root, &mut dropped),
        ides: revive_table(&root, &mut dropped),
        apps: revive_table(&root, &mut dropped),
        macros: revive_table(&root, &mut dropped),
        habits: revive_table(&root, &mut dropped),
        habit_entries: revive_table(&root, &mut dropped),
        crm_tags: revive_table(&root, &mut dropped),
        crm_contacts: revive_table(&root, &mut dropped),
        crm_interactions: revive_table(&root, &mut dropped),
        bills: revive_table(&root, &mut dropped),
        expenses: revive_table(&root, &mut dropped),
        incomes: revive_table(&root, &mut dropped),
        savings_goals: revive_table(&root, &mut dropped),
        budget_categories: revive_table(&root, &mut dropped),
        study_subjects: revive_table(&root, &mut dropped),
        study_sessions: revive_table(&root, &mut dropped),
    };

    let repaired = integrity::repair(&mut doc);
    if dropped.records > 0 || repaired > 0 {
        info!(
            "event=normalize_dropped module=normalize status=repaired records={} collections={} references={}",
            dropped.records,
            dropped.collections.join(","),
            repaired
        );
    }

    doc
}

/// Re-validates an in-memory document by passing its serialized form back
/// through `normalize`.
pub fn normalize_document(doc: &Document) -> Document {
    match serde_json::to_value(doc) {
        Ok(raw) => normalize(&raw),
        Err(err) => {
            error!(
                "event=normalize_document module=normalize status=error error_code=serialize_failed error={}",
                err
            );
            doc.clone()
        }
    }
}

#[derive(Debug, Default)]
struct Dropped {
    records: usize,
    collections: Vec<&'static str>,
}

impl Dropped {
    fn record(&mut self, key: &'static str) {
        self.records += 1;
        if !self.collections.contains(&key) {
            self.collections.push(key);
        }
    }
}

/// Revives one collection. Missing ids get `<collection>-<position>`;
/// a repeated id keeps its first record.
fn revive_table<E: Entity>(root: &Map<String, Value>, dropped: &mut Dropped) -> Table<E> {
    let key = E::KIND.collection_key();
    let mut table = Table::new();
    let items = match root.get(key) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return table,
        Some(_) => {
            dropped.record(key);
            return table;
        }
    };

    for (position, item) in items.iter().enumerate() {
        let Value::Object(map) = item else {
            dropped.record(key);
            continue;
        };
        let fields = Fields::new(map, position);
        let id = fields
            .reference("id")
            .unwrap_or_else(|| format!("{key}-{position}"));
        if table.contains(&id) {
            dropped.record(key);
            continue;
        }
        match E::revive(id, &fields) {
            Some(entity) => {
                table.insert(entity);
            }
            None => dropped.record(key),
        }
    }

    table
}
