//! Canonical domain model for the personal data store.
//!
//! # Responsibility
//! - Define the aggregate `Document` and one record type per collection.
//! - Keep raw-record revival next to each record type so the normalizer stays
//!   generic over entity kinds.
//!
//! # Invariants
//! - Every entity is identified by an opaque, unique string id.
//! - Optional fields serialize as `null`, never as absent keys.

pub mod calendar;
pub mod crm;
pub mod document;
pub mod entity;
pub mod fields;
pub mod finance;
pub mod habits;
pub mod notes;
pub mod planner;
pub mod projects;
pub mod settings;
pub mod shortcuts;
