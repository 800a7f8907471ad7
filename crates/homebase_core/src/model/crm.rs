//! CRM contacts, tags and interaction log.
//!
//! # Invariants
//! - Tag and link relations are id lists owned by the contact.
//! - Every interaction references an existing contact.

use crate::model::entity::{impl_entity, ContainerKey, Ordered, Unordered};
use crate::model::fields::Fields;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Pipeline column a contact sits in; the ordering container for contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStage {
    Lead,
    Contacted,
    Negotiating,
    Client,
    Archived,
}

impl ContactStage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "lead" | "new" => Some(Self::Lead),
            "contacted" => Some(Self::Contacted),
            "negotiating" | "proposal" => Some(Self::Negotiating),
            "client" | "won" => Some(Self::Client),
            "archived" | "lost" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmTag {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

impl CrmTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            color: None,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            color: fields.opt_string("color"),
        })
    }
}

impl_entity!(CrmTag, CrmTag, crm_tags);
impl Unordered for CrmTag {}

/// Kind of entity a contact can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Note,
    CalendarEvent,
    File,
    Card,
    Project,
}

/// Outbound links from a contact to other records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLinks {
    pub note_ids: Vec<String>,
    pub calendar_event_ids: Vec<String>,
    /// File paths or external file ids; not validated against any collection.
    pub file_ids: Vec<String>,
    pub card_ids: Vec<String>,
    pub project_ids: Vec<String>,
}

impl ContactLinks {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            note_ids: fields.string_list("noteIds"),
            calendar_event_ids: fields.string_list("calendarEventIds"),
            file_ids: fields.string_list("fileIds"),
            card_ids: fields.string_list("cardIds"),
            project_ids: fields.string_list("projectIds"),
        }
    }

    pub fn ids(&self, kind: LinkKind) -> &[String] {
        match kind {
            LinkKind::Note => &self.note_ids,
            LinkKind::CalendarEvent => &self.calendar_event_ids,
            LinkKind::File => &self.file_ids,
            LinkKind::Card => &self.card_ids,
            LinkKind::Project => &self.project_ids,
        }
    }

    pub fn ids_mut(&mut self, kind: LinkKind) -> &mut Vec<String> {
        match kind {
            LinkKind::Note => &mut self.note_ids,
            LinkKind::CalendarEvent => &mut self.calendar_event_ids,
            LinkKind::File => &mut self.file_ids,
            LinkKind::Card => &mut self.card_ids,
            LinkKind::Project => &mut self.project_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmContact {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub stage: ContactStage,
    pub tags: Vec<String>,
    pub links: ContactLinks,
    pub notes: String,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CrmContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            stage: ContactStage::Lead,
            tags: Vec::new(),
            links: ContactLinks::default(),
            notes: String::new(),
            order: 0.0,
            created_at: crate::model::fields::epoch(),
            updated_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            email: fields.opt_string("email"),
            phone: fields.opt_string("phone"),
            company: fields.opt_string("company"),
            stage: fields.choice("stage", ContactStage::parse, ContactStage::Lead),
            tags: fields.string_list("tags"),
            links: fields
                .object("links")
                .map(|nested| ContactLinks::from_fields(&nested))
                .unwrap_or_default(),
            notes: fields.string("notes"),
            order: fields.order(),
            created_at: fields.created_at(),
            updated_at: fields.updated_at(),
        })
    }
}

impl_entity!(CrmContact, CrmContact, crm_contacts, tracked);

impl Ordered for CrmContact {
    fn container(&self) -> ContainerKey {
        ContainerKey::Stage(self.stage)
    }

    fn order(&self) -> f64 {
        self.order
    }

    fn set_order(&mut self, order: f64) {
        self.order = order;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Call,
    Email,
    Meeting,
    Message,
    Other,
}

impl InteractionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "call" | "phone" => Some(Self::Call),
            "email" => Some(Self::Email),
            "meeting" => Some(Self::Meeting),
            "message" | "chat" => Some(Self::Message),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmInteraction {
    pub id: String,
    pub contact_id: String,
    pub kind: InteractionKind,
    pub date: Option<NaiveDate>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl CrmInteraction {
    pub fn new(contact_id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            id: String::new(),
            contact_id: contact_id.into(),
            kind,
            date: None,
            summary: String::new(),
            created_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            contact_id: fields.reference("contactId")?,
            kind: fields.choice("kind", InteractionKind::parse, InteractionKind::Other),
            date: fields.date("date"),
            summary: fields.string("summary"),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(
    CrmInteraction,
    CrmInteraction,
    crm_interactions,
    created,
    owner = CrmContact.contact_id
);
impl Unordered for CrmInteraction {}
