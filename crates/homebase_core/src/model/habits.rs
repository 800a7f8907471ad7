//! Habit tracker and study tracker.
//!
//! # Invariants
//! - At most one entry per `(habit_id, date)`; duplicates collapse on load.
//! - Entries and sessions without a date are dropped.

use crate::model::entity::{impl_entity, impl_ordered, Unordered};
use crate::model::fields::Fields;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Longest accepted study session (one day).
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub order: f64,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            color: None,
            order: 0.0,
            created_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            color: fields.opt_string("color"),
            order: fields.order(),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(Habit, Habit, habits, created);
impl_ordered!(Habit, root);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl HabitEntry {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            habit_id: habit_id.into(),
            date,
            completed: true,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            habit_id: fields.reference("habitId")?,
            date: fields.date("date")?,
            completed: fields.bool_or("completed", true),
        })
    }
}

impl_entity!(HabitEntry, HabitEntry, habit_entries, owner = Habit.habit_id);
impl Unordered for HabitEntry {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySubject {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub weekly_goal_minutes: u32,
    pub order: f64,
}

impl StudySubject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            color: None,
            weekly_goal_minutes: 0,
            order: 0.0,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            color: fields.opt_string("color"),
            weekly_goal_minutes: fields.u32_in("weeklyGoalMinutes", 0, 7 * MAX_SESSION_MINUTES, 0),
            order: fields.order(),
        })
    }
}

impl_entity!(StudySubject, StudySubject, study_subjects);
impl_ordered!(StudySubject, root);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    pub date: NaiveDate,
    pub minutes: u32,
    pub notes: String,
}

impl StudySession {
    pub fn new(subject_id: impl Into<String>, date: NaiveDate, minutes: u32) -> Self {
        Self {
            id: String::new(),
            subject_id: subject_id.into(),
            date,
            minutes: minutes.min(MAX_SESSION_MINUTES),
            notes: String::new(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            subject_id: fields.reference("subjectId")?,
            date: fields.date("date")?,
            minutes: fields.u32_in("minutes", 0, MAX_SESSION_MINUTES, 0),
            notes: fields.string("notes"),
        })
    }
}

impl_entity!(StudySession, StudySession, study_sessions, owner = StudySubject.subject_id);
impl Unordered for StudySession {}
