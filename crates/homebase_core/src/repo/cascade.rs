//! Referential-integrity rules applied when a row is removed.
//!
//! # Responsibility
//! - List every inbound reference per entity kind in one static table.
//! - Resolve those references uniformly after a removal.
//!
//! # Invariants
//! - After `apply_cascades(doc, kind, id)`, no row in `doc` references `id`
//!   as a `kind`.
//! - Rules only touch dependents; the removed row itself is the caller's job.

use crate::model::crm::LinkKind;
use crate::model::document::Document;
use crate::model::entity::EntityKind;

/// What happens to a dependent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeAction {
    /// The foreign key becomes `null`; the row survives.
    ClearReference,
    /// The id is filtered out of an id list.
    FilterIdList,
    /// The dependent row is deleted.
    DeleteDependents,
}

/// One inbound reference from `dependent` rows to `removed` rows.
#[derive(Debug, Clone, Copy)]
pub struct CascadeRule {
    pub removed: EntityKind,
    pub dependent: EntityKind,
    pub field: &'static str,
    pub action: CascadeAction,
    apply: fn(&mut Document, &str) -> usize,
}

pub const CASCADE_RULES: &[CascadeRule] = &[
    CascadeRule {
        removed: EntityKind::ShortcutFolder,
        dependent: EntityKind::Shortcut,
        field: "folderId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.shortcuts
                .iter_mut()
                .map(|row| clear(&mut row.folder_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::ShortcutFolder,
        dependent: EntityKind::ShortcutFolder,
        field: "parentId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.shortcut_folders
                .iter_mut()
                .map(|row| clear(&mut row.parent_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::NoteFolder,
        dependent: EntityKind::Note,
        field: "folderId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.notes
                .iter_mut()
                .map(|row| clear(&mut row.folder_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::NoteFolder,
        dependent: EntityKind::NoteFolder,
        field: "parentId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.note_folders
                .iter_mut()
                .map(|row| clear(&mut row.parent_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::Project,
        dependent: EntityKind::Card,
        field: "projectId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.cards
                .iter_mut()
                .map(|row| clear(&mut row.project_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::Project,
        dependent: EntityKind::Note,
        field: "projectId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.notes
                .iter_mut()
                .map(|row| clear(&mut row.project_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::Project,
        dependent: EntityKind::CrmContact,
        field: "links.projectIds",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| unlink_contacts(doc, LinkKind::Project, id),
    },
    CascadeRule {
        removed: EntityKind::Ide,
        dependent: EntityKind::Project,
        field: "preferredIdeId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.projects
                .iter_mut()
                .map(|row| clear(&mut row.preferred_ide_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::App,
        dependent: EntityKind::Macro,
        field: "appIds",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| {
            doc.macros
                .iter_mut()
                .map(|row| filter(&mut row.app_ids, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::Habit,
        dependent: EntityKind::HabitEntry,
        field: "habitId",
        action: CascadeAction::DeleteDependents,
        apply: |doc, id| doc.habit_entries.retain(|row| row.habit_id != id),
    },
    CascadeRule {
        removed: EntityKind::CrmTag,
        dependent: EntityKind::CrmContact,
        field: "tags",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| {
            doc.crm_contacts
                .iter_mut()
                .map(|row| filter(&mut row.tags, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::CrmContact,
        dependent: EntityKind::CrmInteraction,
        field: "contactId",
        action: CascadeAction::DeleteDependents,
        apply: |doc, id| doc.crm_interactions.retain(|row| row.contact_id != id),
    },
    CascadeRule {
        removed: EntityKind::ClipboardCategory,
        dependent: EntityKind::ClipboardItem,
        field: "categoryId",
        action: CascadeAction::ClearReference,
        apply: |doc, id| {
            doc.clipboard_items
                .iter_mut()
                .map(|row| clear(&mut row.category_id, id))
                .sum()
        },
    },
    CascadeRule {
        removed: EntityKind::Note,
        dependent: EntityKind::CrmContact,
        field: "links.noteIds",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| unlink_contacts(doc, LinkKind::Note, id),
    },
    CascadeRule {
        removed: EntityKind::CalendarEvent,
        dependent: EntityKind::CrmContact,
        field: "links.calendarEventIds",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| unlink_contacts(doc, LinkKind::CalendarEvent, id),
    },
    CascadeRule {
        removed: EntityKind::Card,
        dependent: EntityKind::CrmContact,
        field: "links.cardIds",
        action: CascadeAction::FilterIdList,
        apply: |doc, id| unlink_contacts(doc, LinkKind::Card, id),
    },
    CascadeRule {
        removed: EntityKind::StudySubject,
        dependent: EntityKind::StudySession,
        field: "subjectId",
        action: CascadeAction::DeleteDependents,
        apply: |doc, id| doc.study_sessions.retain(|row| row.subject_id != id),
    },
];

/// Rules that fire when a row of `kind` is removed.
pub fn rules_for(kind: EntityKind) -> impl Iterator<Item = &'static CascadeRule> {
    CASCADE_RULES.iter().filter(move |rule| rule.removed == kind)
}

/// Applies every rule for `kind`; returns the number of dependent rows touched.
pub(crate) fn apply_cascades(doc: &mut Document, kind: EntityKind, id: &str) -> usize {
    rules_for(kind).map(|rule| (rule.apply)(doc, id)).sum()
}

fn clear(reference: &mut Option<String>, id: &str) -> usize {
    if reference.as_deref() == Some(id) {
        *reference = None;
        1
    } else {
        0
    }
}

fn filter(ids: &mut Vec<String>, id: &str) -> usize {
    let before = ids.len();
    ids.retain(|candidate| candidate != id);
    usize::from(ids.len() != before)
}

fn unlink_contacts(doc: &mut Document, kind: LinkKind, id: &str) -> usize {
    doc.crm_contacts
        .iter_mut()
        .map(|contact| filter(contact.links.ids_mut(kind), id))
        .sum()
}
