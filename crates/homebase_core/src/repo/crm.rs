//! CRM relations: tags, outbound links and pipeline stage.

use super::{RepoError, RepoResult, Repository};
use crate::model::crm::{ContactStage, CrmContact, CrmTag, LinkKind};
use crate::model::entity::{Entity, EntityKind, Ordered};
use crate::ordering::append_order;

impl Repository<'_> {
    /// Adds `tag_id` to the contact's tags; already tagged is a no-op.
    pub fn tag_contact(&mut self, contact_id: &str, tag_id: &str) -> RepoResult<()> {
        self.require::<CrmTag>(tag_id)?;
        self.update::<CrmContact>(contact_id, |contact| {
            if !contact.tags.iter().any(|tag| tag == tag_id) {
                contact.tags.push(tag_id.to_string());
            }
        })
    }

    pub fn untag_contact(&mut self, contact_id: &str, tag_id: &str) -> RepoResult<()> {
        self.update::<CrmContact>(contact_id, |contact| {
            contact.tags.retain(|tag| tag != tag_id);
        })
    }

    /// Links a contact to another record. File links are free-form and are not
    /// checked against any collection.
    pub fn link_contact(
        &mut self,
        contact_id: &str,
        kind: LinkKind,
        target_id: &str,
    ) -> RepoResult<()> {
        if target_id.trim().is_empty() {
            return Err(RepoError::InvalidInput("link target must not be blank".into()));
        }
        if let Some(target_kind) = link_target_kind(kind) {
            if !self.doc.contains(target_kind, target_id) {
                return Err(super::not_found(target_kind, target_id));
            }
        }
        self.update::<CrmContact>(contact_id, |contact| {
            let ids = contact.links.ids_mut(kind);
            if !ids.iter().any(|id| id == target_id) {
                ids.push(target_id.to_string());
            }
        })
    }

    pub fn unlink_contact(
        &mut self,
        contact_id: &str,
        kind: LinkKind,
        target_id: &str,
    ) -> RepoResult<()> {
        self.update::<CrmContact>(contact_id, |contact| {
            contact.links.ids_mut(kind).retain(|id| id != target_id);
        })
    }

    /// Moves a contact to another pipeline column, after the column's
    /// current members.
    pub fn set_stage(&mut self, contact_id: &str, stage: ContactStage) -> RepoResult<()> {
        let mut target = self.require::<CrmContact>(contact_id)?.clone();
        if target.stage == stage {
            return Ok(());
        }
        target.stage = stage;
        let order = append_order(CrmContact::table(self.doc), &target.container());
        self.update::<CrmContact>(contact_id, |contact| {
            contact.stage = stage;
            contact.order = order;
        })
    }
}

fn link_target_kind(kind: LinkKind) -> Option<EntityKind> {
    match kind {
        LinkKind::Note => Some(EntityKind::Note),
        LinkKind::CalendarEvent => Some(EntityKind::CalendarEvent),
        LinkKind::Card => Some(EntityKind::Card),
        LinkKind::Project => Some(EntityKind::Project),
        LinkKind::File => None,
    }
}
