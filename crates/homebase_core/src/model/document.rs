//! The aggregate document: settings plus one table per entity kind.
//!
//! # Invariants
//! - `version` of a canonical document is always the latest schema version.
//! - The document is read and written as a whole.

use crate::model::calendar::CalendarEvent;
use crate::model::crm::{CrmContact, CrmInteraction, CrmTag};
use crate::model::entity::{EntityKind, Table};
use crate::model::finance::{Bill, BudgetCategory, Expense, Income, SavingsGoal};
use crate::model::habits::{Habit, HabitEntry, StudySession, StudySubject};
use crate::model::notes::{Note, NoteFolder};
use crate::model::planner::Card;
use crate::model::projects::{App, Ide, Macro, Project};
use crate::model::settings::Settings;
use crate::model::shortcuts::{
    ClipboardCategory, ClipboardItem, PathEntry, Shortcut, ShortcutFolder,
};
use crate::normalize::migrations::latest_version;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: u32,
    pub settings: Settings,
    pub cards: Table<Card>,
    pub calendar_events: Table<CalendarEvent>,
    pub shortcut_folders: Table<ShortcutFolder>,
    pub shortcuts: Table<Shortcut>,
    pub paths: Table<PathEntry>,
    pub clipboard_categories: Table<ClipboardCategory>,
    pub clipboard_items: Table<ClipboardItem>,
    pub note_folders: Table<NoteFolder>,
    pub notes: Table<Note>,
    pub projects: Table<Project>,
    pub ides: Table<Ide>,
    pub apps: Table<App>,
    pub macros: Table<Macro>,
    pub habits: Table<Habit>,
    pub habit_entries: Table<HabitEntry>,
    pub crm_tags: Table<CrmTag>,
    pub crm_contacts: Table<CrmContact>,
    pub crm_interactions: Table<CrmInteraction>,
    pub bills: Table<Bill>,
    pub expenses: Table<Expense>,
    pub incomes: Table<Income>,
    pub savings_goals: Table<SavingsGoal>,
    pub budget_categories: Table<BudgetCategory>,
    pub study_subjects: Table<StudySubject>,
    pub study_sessions: Table<StudySession>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: latest_version(),
            settings: Settings::default(),
            cards: Table::new(),
            calendar_events: Table::new(),
            shortcut_folders: Table::new(),
            shortcuts: Table::new(),
            paths: Table::new(),
            clipboard_categories: Table::new(),
            clipboard_items: Table::new(),
            note_folders: Table::new(),
            notes: Table::new(),
            projects: Table::new(),
            ides: Table::new(),
            apps: Table::new(),
            macros: Table::new(),
            habits: Table::new(),
            habit_entries: Table::new(),
            crm_tags: Table::new(),
            crm_contacts: Table::new(),
            crm_interactions: Table::new(),
            bills: Table::new(),
            expenses: Table::new(),
            incomes: Table::new(),
            savings_goals: Table::new(),
            budget_categories: Table::new(),
            study_subjects: Table::new(),
            study_sessions: Table::new(),
        }
    }
}

impl Document {
    /// Empty canonical document at the latest schema version.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Row count of one collection.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Card => self.cards.len(),
            EntityKind::CalendarEvent => self.calendar_events.len(),
            EntityKind::ShortcutFolder => self.shortcut_folders.len(),
            EntityKind::Shortcut => self.shortcuts.len(),
            EntityKind::Path => self.paths.len(),
            EntityKind::ClipboardCategory => self.clipboard_categories.len(),
            EntityKind::ClipboardItem => self.clipboard_items.len(),
            EntityKind::NoteFolder => self.note_folders.len(),
            EntityKind::Note => self.notes.len(),
            EntityKind::Project => self.projects.len(),
            EntityKind::Ide => self.ides.len(),
            EntityKind::App => self.apps.len(),
            EntityKind::Macro => self.macros.len(),
            EntityKind::Habit => self.habits.len(),
            EntityKind::HabitEntry => self.habit_entries.len(),
            EntityKind::CrmTag => self.crm_tags.len(),
            EntityKind::CrmContact => self.crm_contacts.len(),
            EntityKind::CrmInteraction => self.crm_interactions.len(),
            EntityKind::Bill => self.bills.len(),
            EntityKind::Expense => self.expenses.len(),
            EntityKind::Income => self.incomes.len(),
            EntityKind::SavingsGoal => self.savings_goals.len(),
            EntityKind::BudgetCategory => self.budget_categories.len(),
            EntityKind::StudySubject => self.study_subjects.len(),
            EntityKind::StudySession => self.study_sessions.len(),
        }
    }

    /// Whether `id` exists in the collection of `kind`.
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Card => self.cards.contains(id),
            EntityKind::CalendarEvent => self.calendar_events.contains(id),
            EntityKind::ShortcutFolder => self.shortcut_folders.contains(id),
            EntityKind::Shortcut => self.shortcuts.contains(id),
            EntityKind::Path => self.paths.contains(id),
            EntityKind::ClipboardCategory => self.clipboard_categories.contains(id),
            EntityKind::ClipboardItem => self.clipboard_items.contains(id),
            EntityKind::NoteFolder => self.note_folders.contains(id),
            EntityKind::Note => self.notes.contains(id),
            EntityKind::Project => self.projects.contains(id),
            EntityKind::Ide => self.ides.contains(id),
            EntityKind::App => self.apps.contains(id),
            EntityKind::Macro => self.macros.contains(id),
            EntityKind::Habit => self.habits.contains(id),
            EntityKind::HabitEntry => self.habit_entries.contains(id),
            EntityKind::CrmTag => self.crm_tags.contains(id),
            EntityKind::CrmContact => self.crm_contacts.contains(id),
            EntityKind::CrmInteraction => self.crm_interactions.contains(id),
            EntityKind::Bill => self.bills.contains(id),
            EntityKind::Expense => self.expenses.contains(id),
            EntityKind::Income => self.incomes.contains(id),
            EntityKind::SavingsGoal => self.savings_goals.contains(id),
            EntityKind::BudgetCategory => self.budget_categories.contains(id),
            EntityKind::StudySubject => self.study_subjects.contains(id),
            EntityKind::StudySession => self.study_sessions.contains(id),
        }
    }
}
