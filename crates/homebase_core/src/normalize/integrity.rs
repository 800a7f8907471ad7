//! Cross-collection reference repair for revived documents.
//!
//! # Responsibility
//! - Null foreign keys that point at missing rows.
//! - Drop dependent rows whose owner is gone.
//! - Cut folder parent chains that loop or dangle.
//!
//! # Invariants
//! - Runs after every table has been revived, so lookups see final ids.
//! - A repaired document passes through `repair` unchanged.

use crate::model::crm::LinkKind;
use crate::model::document::Document;
use crate::model::entity::{creates_cycle, Entity, Nested, Table};
use std::collections::HashSet;

/// Repairs references in place and returns how many values were touched.
pub(crate) fn repair(doc: &mut Document) -> usize {
    let mut fixes = 0;
    fixes += cut_forest(&mut doc.shortcut_folders);
    fixes += cut_forest(&mut doc.note_folders);

    for card in doc.cards.iter_mut() {
        fixes += clear_dangling(&mut card.project_id, |id| doc.projects.contains(id));
    }
    for note in doc.notes.iter_mut() {
        fixes += clear_dangling(&mut note.folder_id, |id| doc.note_folders.contains(id));
        fixes += clear_dangling(&mut note.project_id, |id| doc.projects.contains(id));
    }
    for shortcut in doc.shortcuts.iter_mut() {
        fixes += clear_dangling(&mut shortcut.folder_id, |id| {
            doc.shortcut_folders.contains(id)
        });
    }
    for item in doc.clipboard_items.iter_mut() {
        fixes += clear_dangling(&mut item.category_id, |id| {
            doc.clipboard_categories.contains(id)
        });
    }
    for project in doc.projects.iter_mut() {
        fixes += clear_dangling(&mut project.preferred_ide_id, |id| doc.ides.contains(id));
    }
    for entry in doc.macros.iter_mut() {
        fixes += filter_ids(&mut entry.app_ids, |id| doc.apps.contains(id));
    }

    for contact in doc.crm_contacts.iter_mut() {
        fixes += filter_ids(&mut contact.tags, |id| doc.crm_tags.contains(id));
        let links = &mut contact.links;
        fixes += filter_ids(links.ids_mut(LinkKind::Note), |id| doc.notes.contains(id));
        fixes += filter_ids(links.ids_mut(LinkKind::CalendarEvent), |id| {
            doc.calendar_events.contains(id)
        });
        fixes += filter_ids(links.ids_mut(LinkKind::Card), |id| doc.cards.contains(id));
        fixes += filter_ids(links.ids_mut(LinkKind::Project), |id| doc.projects.contains(id));
    }

    fixes += doc
        .crm_interactions
        .retain(|interaction| doc.crm_contacts.contains(&interaction.contact_id));
    fixes += doc
        .study_sessions
        .retain(|session| doc.study_subjects.contains(&session.subject_id));
    fixes += doc
        .habit_entries
        .retain(|entry| doc.habits.contains(&entry.habit_id));

    let mut seen = HashSet::new();
    fixes += doc
        .habit_entries
        .retain(|entry| seen.insert((entry.habit_id.clone(), entry.date)));

    fixes
}

fn clear_dangling(reference: &mut Option<String>, exists: impl Fn(&str) -> bool) -> usize {
    match reference.as_deref() {
        Some(id) if !exists(id) => {
            *reference = None;
            1
        }
        _ => 0,
    }
}

fn filter_ids(ids: &mut Vec<String>, exists: impl Fn(&str) -> bool) -> usize {
    let before = ids.len();
    ids.retain(|id| exists(id));
    before - ids.len()
}

/// Detaches folders whose parent is missing or whose chain loops back.
///
/// Folders are visited in table order; the first folder found on a loop is
/// the one moved to the top level.
fn cut_forest<E: Nested>(table: &mut Table<E>) -> usize {
    let ids = table.ids().map(str::to_string).collect::<Vec<_>>();
    let mut cut = 0;
    for id in ids {
        let Some(parent) = table.get(&id).and_then(Entity::tree_parent).map(str::to_string) else {
            continue;
        };
        if table.contains(&parent) && !creates_cycle(table, &id, &parent) {
            continue;
        }
        if let Some(folder) = table.get_mut(&id) {
            folder.set_parent_id(None);
            cut += 1;
        }
    }
    cut
}
