//! Shared entity contracts and the indexed table type.
//!
//! # Responsibility
//! - Name every entity kind and its collection key in the persisted document.
//! - Provide `Table<E>`, the id-indexed collection used for every kind.
//! - Define the `Entity` / `Ordered` / `Unordered` / `Nested` traits the
//!   repository and ordering manager are generic over.
//!
//! # Invariants
//! - Ids are unique within a table; inserting an existing id replaces it.
//! - A table serializes as a plain JSON array of its rows.

use crate::model::crm::ContactStage;
use crate::model::document::Document;
use crate::model::fields::Fields;
use crate::model::planner::Location;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Every collection stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Card,
    CalendarEvent,
    ShortcutFolder,
    Shortcut,
    Path,
    ClipboardCategory,
    ClipboardItem,
    NoteFolder,
    Note,
    Project,
    Ide,
    App,
    Macro,
    Habit,
    HabitEntry,
    CrmTag,
    CrmContact,
    CrmInteraction,
    Bill,
    Expense,
    Income,
    SavingsGoal,
    BudgetCategory,
    StudySubject,
    StudySession,
}

impl EntityKind {
    pub const ALL: [EntityKind; 25] = [
        Self::Card,
        Self::CalendarEvent,
        Self::ShortcutFolder,
        Self::Shortcut,
        Self::Path,
        Self::ClipboardCategory,
        Self::ClipboardItem,
        Self::NoteFolder,
        Self::Note,
        Self::Project,
        Self::Ide,
        Self::App,
        Self::Macro,
        Self::Habit,
        Self::HabitEntry,
        Self::CrmTag,
        Self::CrmContact,
        Self::CrmInteraction,
        Self::Bill,
        Self::Expense,
        Self::Income,
        Self::SavingsGoal,
        Self::BudgetCategory,
        Self::StudySubject,
        Self::StudySession,
    ];

    /// Key of this collection in the persisted document.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Card => "cards",
            Self::CalendarEvent => "calendarEvents",
            Self::ShortcutFolder => "shortcutFolders",
            Self::Shortcut => "shortcuts",
            Self::Path => "paths",
            Self::ClipboardCategory => "clipboardCategories",
            Self::ClipboardItem => "clipboardItems",
            Self::NoteFolder => "noteFolders",
            Self::Note => "notes",
            Self::Project => "projects",
            Self::Ide => "ides",
            Self::App => "apps",
            Self::Macro => "macros",
            Self::Habit => "habits",
            Self::HabitEntry => "habitEntries",
            Self::CrmTag => "crmTags",
            Self::CrmContact => "crmContacts",
            Self::CrmInteraction => "crmInteractions",
            Self::Bill => "bills",
            Self::Expense => "expenses",
            Self::Income => "incomes",
            Self::SavingsGoal => "savingsGoals",
            Self::BudgetCategory => "budgetCategories",
            Self::StudySubject => "studySubjects",
            Self::StudySession => "studySessions",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_key())
    }
}

/// Grouping context inside which `order` values are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerKey {
    /// Planner backlog or one day x period cell.
    Planner(Location),
    /// Children of one parent (folder, category). `None` is the top level.
    Parent(Option<String>),
    /// One CRM pipeline stage.
    Stage(ContactStage),
    /// Flat collection with a single container.
    Root,
}

/// Contract shared by every stored entity kind.
pub trait Entity: Clone + Serialize {
    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Builds a canonical entity from raw fields, or `None` when the record
    /// cannot be salvaged.
    fn revive(id: String, fields: &Fields<'_>) -> Option<Self>;

    fn table(doc: &Document) -> &Table<Self>;
    fn table_mut(doc: &mut Document) -> &mut Table<Self>;

    /// Sets creation timestamps, if the kind tracks them.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Refreshes `updatedAt`, if the kind tracks it.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Re-derives denormalized fields after an update. `previous` is the
    /// entity as it was before the caller's edit.
    fn rederive(&mut self, _previous: &Self) {}

    /// Required owner row, for kinds that cannot exist without one.
    fn owner(&self) -> Option<(EntityKind, &str)> {
        None
    }

    /// Parent row of the same kind, for kinds that form a folder tree.
    fn tree_parent(&self) -> Option<&str> {
        None
    }
}

/// Entity kinds that carry a user-controlled sibling order.
pub trait Ordered: Entity {
    fn container(&self) -> ContainerKey;
    fn order(&self) -> f64;
    fn set_order(&mut self, order: f64);
}

/// Entity kinds without a sibling order.
///
/// Only these are created through `Repository::add`; ordered kinds go through
/// `Repository::append` so they always land after their siblings.
pub trait Unordered: Entity {}

/// Entity kinds that form a forest through a self-referencing parent id,
/// read back through `Entity::tree_parent`.
pub trait Nested: Entity {
    fn set_parent_id(&mut self, parent_id: Option<String>);
}

/// Returns whether making `candidate_parent` the parent of `node_id` would
/// make the node its own ancestor.
///
/// Walks `parent_id` upward from `candidate_parent`; a loop already present in
/// the chain also counts as a cycle.
pub fn creates_cycle<E: Entity>(table: &Table<E>, node_id: &str, candidate_parent: &str) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = Some(candidate_parent);
    while let Some(current) = cursor {
        if current == node_id || !visited.insert(current) {
            return true;
        }
        cursor = table.get(current).and_then(Entity::tree_parent);
    }
    false
}

/// Id-indexed collection of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<E> {
    rows: IndexMap<String, E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut E> {
        self.rows.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Inserts or replaces the row with the same id.
    pub fn insert(&mut self, entity: E) -> Option<E> {
        self.rows.insert(entity.id().to_string(), entity)
    }

    pub fn remove(&mut self, id: &str) -> Option<E> {
        self.rows.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.rows.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Keeps rows matching `keep`; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| keep(row));
        before - self.rows.len()
    }
}

impl<E: Entity> FromIterator<E> for Table<E> {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        let mut table = Self::new();
        for entity in iter {
            table.insert(entity);
        }
        table
    }
}

impl<E: Serialize> Serialize for Table<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

/// Implements `Entity` for a struct with an `id: String` field and an
/// inherent `from_fields(id, fields)` constructor.
///
/// The optional trailing marker selects timestamp handling:
/// `created` (only `created_at`) or `tracked` (`created_at` + `updated_at`).
/// `owner = Kind.field` declares a required owner reference instead, and
/// `nested` marks a folder kind whose `parent_id` points into its own table.
macro_rules! impl_entity {
    ($ty:ident, $kind:ident, $table:ident, owner = $owner:ident . $field:ident) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn owner(&self) -> Option<($crate::model::entity::EntityKind, &str)> {
                Some(($crate::model::entity::EntityKind::$owner, self.$field.as_str()))
            }
        });
    };
    ($ty:ident, $kind:ident, $table:ident, created, owner = $owner:ident . $field:ident) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn stamp_created(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.created_at = now;
            }

            fn owner(&self) -> Option<($crate::model::entity::EntityKind, &str)> {
                Some(($crate::model::entity::EntityKind::$owner, self.$field.as_str()))
            }
        });
    };
    ($ty:ident, $kind:ident, $table:ident) => {
        impl_entity!(@impl $ty, $kind, $table, {});
    };
    ($ty:ident, $kind:ident, $table:ident, nested) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn tree_parent(&self) -> Option<&str> {
                self.parent_id.as_deref()
            }
        });
    };
    ($ty:ident, $kind:ident, $table:ident, created) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn stamp_created(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.created_at = now;
            }
        });
    };
    ($ty:ident, $kind:ident, $table:ident, tracked) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn stamp_created(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.created_at = now;
                self.updated_at = now;
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }
        });
    };
    ($ty:ident, $kind:ident, $table:ident, tracked, rederive) => {
        impl_entity!(@impl $ty, $kind, $table, {
            fn stamp_created(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.created_at = now;
                self.updated_at = now;
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }

            fn rederive(&mut self, previous: &Self) {
                $ty::rederive_from(self, previous);
            }
        });
    };
    (@impl $ty:ident, $kind:ident, $table:ident, { $($extra:tt)* }) => {
        impl $crate::model::entity::Entity for $ty {
            const KIND: $crate::model::entity::EntityKind =
                $crate::model::entity::EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn revive(id: String, fields: &$crate::model::fields::Fields<'_>) -> Option<Self> {
                $ty::from_fields(id, fields)
            }

            fn table(doc: &$crate::model::document::Document) -> &$crate::model::entity::Table<Self> {
                &doc.$table
            }

            fn table_mut(
                doc: &mut $crate::model::document::Document,
            ) -> &mut $crate::model::entity::Table<Self> {
                &mut doc.$table
            }

            $($extra)*
        }
    };
}

/// Implements `Ordered` for entities whose container is either the whole
/// collection (`root`) or an optional parent id field.
macro_rules! impl_ordered {
    ($ty:ident, root) => {
        impl $crate::model::entity::Ordered for $ty {
            fn container(&self) -> $crate::model::entity::ContainerKey {
                $crate::model::entity::ContainerKey::Root
            }

            fn order(&self) -> f64 {
                self.order
            }

            fn set_order(&mut self, order: f64) {
                self.order = order;
            }
        }
    };
    ($ty:ident, parent = $field:ident) => {
        impl $crate::model::entity::Ordered for $ty {
            fn container(&self) -> $crate::model::entity::ContainerKey {
                $crate::model::entity::ContainerKey::Parent(self.$field.clone())
            }

            fn order(&self) -> f64 {
                self.order
            }

            fn set_order(&mut self, order: f64) {
                self.order = order;
            }
        }
    };
}

pub(crate) use impl_entity;
pub(crate) use impl_ordered;
