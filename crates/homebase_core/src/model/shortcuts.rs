//! Launcher shortcuts, saved paths and the clipboard shelf.

use crate::model::entity::{impl_entity, impl_ordered, Nested};
use crate::model::fields::Fields;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Folder in the shortcut tree. Folders form a forest via `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutFolder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub order: f64,
}

impl ShortcutFolder {
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

impl_entity!(ShortcutFolder, ShortcutFolder, shortcut_folders, nested);
impl_ordered!(ShortcutFolder, parent = parent_id);

/// Web or application link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub id: String,
    pub name: String,
    pub target: String,
    pub icon: Option<String>,
    pub folder_id: Option<String>,
    pub order: f64,
    pub created_at: DateTime<Utc>,
}

impl Shortcut {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            target: target.into(),
            icon: None,
            folder_id: None,
            order: 0.0,
            created_at: crate::model::fields::epoch(),
        }
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            target: fields
                .opt_string("target")
                .or_else(|| fields.opt_string("url"))
                .unwrap_or_default(),
            icon: fields.opt_string("icon"),
            folder_id: fields.reference("folderId"),
            order: fields.order(),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(Shortcut, Shortcut, shortcuts, created);
impl_ordered!(Shortcut, parent = folder_id);

/// Saved filesystem location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    pub id: String,
    pub name: String,
    pub path: String,
    pub order: f64,
}

impl PathEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            path: path.into(),
            order: 0.0,
        }
    }

    /// Entries without a path are dropped.
    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        let path = fields.opt_string("path")?;
        Some(Self {
            id,
            name: fields.string_or("name", &path),
            path,
            order: fields.order(),
        })
    }
}

impl_entity!(PathEntry, Path, paths);
impl_ordered!(PathEntry, root);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardCategory {
    pub id: String,
    pub name: String,
    pub order: f64,
}

impl ClipboardCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            order: 0.0,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            order: fields.order(),
        })
    }
}

impl_entity!(ClipboardCategory, ClipboardCategory, clipboard_categories);
impl_ordered!(ClipboardCategory, root);

/// Saved snippet on the clipboard shelf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardItem {
    pub id: String,
    pub content: String,
    pub category_id: Option<String>,
    pub pinned: bool,
    pub order: f64,
    pub created_at: DateTime<Utc>,
}

impl ClipboardItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            content: content.into(),
            category_id: None,
            pinned: false,
            order: 0.0,
            created_at: crate::model::fields::epoch(),
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            content: fields.string("content"),
            category_id: fields.reference("categoryId"),
            pinned: fields.bool("pinned"),
            order: fields.order(),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(ClipboardItem, ClipboardItem, clipboard_items, created);
impl_ordered!(ClipboardItem, parent = category_id);

impl Nested for ShortcutFolder {
    fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }
}
