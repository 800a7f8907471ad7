//! Folder tree moves for shortcut and note folders.
//!
//! # Invariants
//! - The destination folder must exist when provided.
//! - A folder can never be moved under itself or its descendants.

use super::{RepoResult, Repository};
use crate::model::entity::{Nested, Ordered};
use crate::model::notes::{Note, NoteFolder};
use crate::model::shortcuts::{Shortcut, ShortcutFolder};
use crate::ordering::append_order;

impl Repository<'_> {
    pub fn move_shortcut_folder(&mut self, id: &str, parent_id: Option<&str>) -> RepoResult<()> {
        self.reparent::<ShortcutFolder>(id, parent_id)
    }

    pub fn move_note_folder(&mut self, id: &str, parent_id: Option<&str>) -> RepoResult<()> {
        self.reparent::<NoteFolder>(id, parent_id)
    }

    /// Files a shortcut under `folder_id`, or the top level for `None`.
    pub fn move_shortcut(&mut self, id: &str, folder_id: Option<&str>) -> RepoResult<()> {
        if let Some(folder_id) = folder_id {
            self.require::<ShortcutFolder>(folder_id)?;
        }
        let folder_id = folder_id.map(str::to_string);
        let mut target = self.require::<Shortcut>(id)?.clone();
        target.folder_id = folder_id.clone();
        let order = append_order(&self.doc.shortcuts, &target.container());
        self.update::<Shortcut>(id, |shortcut| {
            if shortcut.folder_id != folder_id {
                shortcut.folder_id = folder_id;
                shortcut.order = order;
            }
        })
    }

    /// Files a note under `folder_id`, or the top level for `None`.
    pub fn move_note(&mut self, id: &str, folder_id: Option<&str>) -> RepoResult<()> {
        if let Some(folder_id) = folder_id {
            self.require::<NoteFolder>(folder_id)?;
        }
        let folder_id = folder_id.map(str::to_string);
        let mut target = self.require::<Note>(id)?.clone();
        target.folder_id = folder_id.clone();
        let order = append_order(&self.doc.notes, &target.container());
        self.update::<Note>(id, |note| {
            if note.folder_id != folder_id {
                note.folder_id = folder_id;
                note.order = order;
            }
        })
    }

    fn reparent<E: Nested + Ordered>(&mut self, id: &str, parent_id: Option<&str>) -> RepoResult<()> {
        let mut moved = self.require::<E>(id)?.clone();
        if moved.tree_parent() == parent_id {
            return Ok(());
        }
        moved.set_parent_id(parent_id.map(str::to_string));
        self.ensure_tree_parent(&moved)?;

        let now = self.now;
        let table = E::table_mut(self.doc);
        moved.set_order(append_order(table, &moved.container()));
        moved.touch(now);
        table.insert(moved);
        Ok(())
    }
}
