//! Notes and the note folder tree.

use crate::model::entity::{impl_entity, impl_ordered, Nested};
use crate::model::fields::Fields;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFolder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub order: f64,
}

impl NoteFolder {
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            parent_id,
            order: 0.0,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            parent_id: fields.reference("parentId"),
            order: fields.order(),
        })
    }
}

impl_entity!(NoteFolder, NoteFolder, note_folders, nested);
impl_ordered!(NoteFolder, parent = parent_id);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub folder_id: Option<String>,
    pub project_id: Option<String>,
    pub pinned: bool,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            content: content.into(),
            folder_id: None,
            project_id: None,
            pinned: false,
            order: 0.0,
            created_at: crate::model::fields::epoch(),
            updated_at: crate::model::fields::epoch(),
        }
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            title: fields.string("title"),
            content: fields.string("content"),
            folder_id: fields.reference("folderId"),
            project_id: fields.reference("projectId"),
            pinned: fields.bool("pinned"),
            order: fields.order(),
            created_at: fields.created_at(),
            updated_at: fields.updated_at(),
        })
    }
}

impl_entity!(Note, Note, notes, tracked);
impl_ordered!(Note, parent = folder_id);

impl Nested for NoteFolder {
    fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }
}
