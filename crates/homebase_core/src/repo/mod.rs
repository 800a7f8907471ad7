//! Entity repository: CRUD over the in-memory document plus cascades.
//!
//! # Responsibility
//! - Create, update and remove rows of any entity kind.
//! - Resolve inbound references on remove via the `cascade` rule table.
//! - Host the cross-entity use cases (planner moves, folder moves, CRM
//!   relations, habit toggles, settings edits).
//!
//! # Invariants
//! - A `Repository` works on a caller-owned working copy. An `Err` means the
//!   caller must discard that copy; partial edits are never published.
//! - `update` can never change an entity's id, and a folder edited through
//!   `update` is held to the same parent checks as `move_*_folder`.
//! - Ordered kinds are only created through `append`, so they always land
//!   after their siblings; `add` is limited to unordered kinds.
//!
//! # See also
//! - `service::store` for the snapshot/working-copy lifecycle.

pub mod cascade;
mod crm;
mod folders;
mod habits;
mod planner;

use crate::clock::new_id;
use crate::model::document::Document;
use crate::model::entity::{creates_cycle, ContainerKey, Entity, EntityKind, Ordered, Unordered};
use crate::model::settings::{Settings, MAX_BACKUP_INTERVAL_DAYS};
use crate::normalize::theme::is_known_theme;
use crate::ordering::{append_order, apply_order};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository operations. None of them leave a partial edit
/// behind once the working copy is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Target row, or a row it must reference, does not exist.
    NotFound { kind: EntityKind, id: String },
    /// Move would make a folder its own ancestor.
    CycleDetected { node_id: String, parent_id: String },
    /// Input outside the accepted domain.
    InvalidInput(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} row not found: {id}"),
            Self::CycleDetected { node_id, parent_id } => write!(
                f,
                "move would create cycle: node {node_id} under parent {parent_id}"
            ),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl Error for RepoError {}

/// Mutable view over one working copy of the document.
pub struct Repository<'doc> {
    doc: &'doc mut Document,
    now: DateTime<Utc>,
}

impl<'doc> Repository<'doc> {
    /// `now` stamps every timestamp written through this repository.
    pub fn new(doc: &'doc mut Document, now: DateTime<Utc>) -> Self {
        Self { doc, now }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::table(self.doc).get(id)
    }

    /// Like `get`, but a missing row is an error.
    pub fn require<E: Entity>(&self, id: &str) -> RepoResult<&E> {
        self.get(id).ok_or_else(|| not_found(E::KIND, id))
    }

    /// Inserts `draft` under a fresh id and returns the id.
    ///
    /// Timestamps are stamped; a required owner must exist.
    pub fn add<E: Unordered>(&mut self, draft: E) -> RepoResult<String> {
        self.insert(draft)
    }

    /// Creates an ordered row, placed after its current siblings.
    pub fn append<E: Ordered>(&mut self, mut draft: E) -> RepoResult<String> {
        let order = append_order(E::table(self.doc), &draft.container());
        draft.set_order(order);
        self.insert(draft)
    }

    fn insert<E: Entity>(&mut self, mut draft: E) -> RepoResult<String> {
        let id = new_id();
        draft.set_id(id.clone());
        self.ensure_owner(&draft)?;
        self.ensure_tree_parent(&draft)?;
        draft.stamp_created(self.now);
        E::table_mut(self.doc).insert(draft);
        Ok(id)
    }

    /// Applies `edit` to the row, then re-derives dependent fields and
    /// refreshes `updatedAt`.
    ///
    /// A changed folder parent must exist and must not be the folder itself
    /// or one of its descendants.
    pub fn update<E: Entity>(&mut self, id: &str, edit: impl FnOnce(&mut E)) -> RepoResult<()> {
        let row = E::table_mut(self.doc)
            .get_mut(id)
            .ok_or_else(|| not_found(E::KIND, id))?;
        let previous = row.clone();
        edit(&mut *row);
        row.set_id(id.to_string());
        row.rederive(&previous);
        row.touch(self.now);

        let updated = row.clone();
        self.ensure_owner(&updated)?;
        if updated.tree_parent() != previous.tree_parent() {
            self.ensure_tree_parent(&updated)?;
        }
        Ok(())
    }

    /// Removes the row and resolves every inbound reference to it.
    pub fn remove<E: Entity>(&mut self, id: &str) -> RepoResult<E> {
        let removed = E::table_mut(self.doc)
            .remove(id)
            .ok_or_else(|| not_found(E::KIND, id))?;
        let touched = cascade::apply_cascades(self.doc, E::KIND, id);
        if touched > 0 {
            info!(
                "event=cascade_applied module=repo status=ok kind={} dependents={}",
                E::KIND,
                touched
            );
        }
        Ok(removed)
    }

    /// Rewrites sibling order inside `container` from `ordered_ids`.
    pub fn reorder<E: Ordered>(
        &mut self,
        container: &ContainerKey,
        ordered_ids: &[String],
    ) -> usize {
        apply_order(E::table_mut(self.doc), container, ordered_ids)
    }

    /// Edits the settings singleton. Theme and backup interval are validated.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) -> RepoResult<()> {
        let mut settings = self.doc.settings.clone();
        edit(&mut settings);
        if !is_known_theme(&settings.theme) {
            return Err(RepoError::InvalidInput(format!(
                "unknown theme `{}`",
                settings.theme
            )));
        }
        if settings.backup_interval_days == 0
            || settings.backup_interval_days > MAX_BACKUP_INTERVAL_DAYS
        {
            return Err(RepoError::InvalidInput(format!(
                "backup interval must be 1..={MAX_BACKUP_INTERVAL_DAYS} days"
            )));
        }
        self.doc.settings = settings;
        Ok(())
    }

    /// Checks that `entity`'s folder parent exists and is not inside the
    /// entity's own subtree.
    pub(crate) fn ensure_tree_parent<E: Entity>(&self, entity: &E) -> RepoResult<()> {
        let Some(parent_id) = entity.tree_parent() else {
            return Ok(());
        };
        let table = E::table(self.doc);
        if !table.contains(parent_id) {
            return Err(not_found(E::KIND, parent_id));
        }
        if creates_cycle(table, entity.id(), parent_id) {
            warn!(
                "event=move_rejected module=repo status=rejected kind={} reason=cycle",
                E::KIND
            );
            return Err(RepoError::CycleDetected {
                node_id: entity.id().to_string(),
                parent_id: parent_id.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_owner<E: Entity>(&self, entity: &E) -> RepoResult<()> {
        match entity.owner() {
            Some((kind, owner_id)) if !self.doc.contains(kind, owner_id) => {
                Err(not_found(kind, owner_id))
            }
            _ => Ok(()),
        }
    }
}

pub(crate) fn not_found(kind: EntityKind, id: &str) -> RepoError {
    RepoError::NotFound {
        kind,
        id: id.to_string(),
    }
}
