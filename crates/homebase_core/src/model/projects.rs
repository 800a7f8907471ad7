//! Projects and the launcher registry (IDEs, apps, macros).

use crate::model::entity::{impl_entity, impl_ordered, Unordered};
use crate::model::fields::Fields;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Done,
}

impl ProjectStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "active" | "in_progress" => Some(Self::Active),
            "paused" | "on_hold" => Some(Self::Paused),
            "done" | "completed" | "archived" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Working directory opened by the preferred IDE.
    pub path: Option<String>,
    pub status: ProjectStatus,
    pub preferred_ide_id: Option<String>,
    pub color: Option<String>,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            path: None,
            status: ProjectStatus::Active,
            preferred_ide_id: None,
            color: None,
            order: 0.0,
            created_at: crate::model::fields::epoch(),
            updated_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            description: fields.string("description"),
            path: fields.opt_string("path"),
            status: fields.choice("status", ProjectStatus::parse, ProjectStatus::Active),
            preferred_ide_id: fields.reference("preferredIdeId"),
            color: fields.opt_string("color"),
            order: fields.order(),
            created_at: fields.created_at(),
            updated_at: fields.updated_at(),
        })
    }
}

impl_entity!(Project, Project, projects, tracked);
impl_ordered!(Project, root);

/// Registered editor that projects can be opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ide {
    pub id: String,
    pub name: String,
    /// Executable or launch command.
    pub command: String,
}

impl Ide {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            command: command.into(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            command: fields
                .opt_string("command")
                .or_else(|| fields.opt_string("path"))
                .unwrap_or_default(),
        })
    }
}

impl_entity!(Ide, Ide, ides);
impl Unordered for Ide {}

/// Launchable desktop application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl App {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            path: path.into(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            path: fields.string("path"),
        })
    }
}

impl_entity!(App, App, apps);
impl Unordered for App {}

/// Named group of apps launched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Macro {
    pub id: String,
    pub name: String,
    pub app_ids: Vec<String>,
    pub order: f64,
}

impl Macro {
    pub fn new(name: impl Into<String>, app_ids: Vec<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            app_ids,
            order: 0.0,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            app_ids: fields.string_list("appIds"),
            order: fields.order(),
        })
    }
}

impl_entity!(Macro, Macro, macros);
impl_ordered!(Macro, root);
