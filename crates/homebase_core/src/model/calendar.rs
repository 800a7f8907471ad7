//! Calendar events and their recurrence/reminder settings.
//!
//! # Invariants
//! - A recurring event is stored once; occurrences are derived on read.
//! - `recurrence.interval >= 1`.
//! - Missing `recurrence` / `reminder` are `null`, never absent keys.

use crate::model::entity::{impl_entity, Unordered};
use crate::model::fields::Fields;
use crate::model::planner::ClockTime;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Longest accepted reminder offset (one week).
pub const MAX_REMINDER_OFFSET_MINUTES: u32 = 7 * 24 * 60;
/// Largest accepted recurrence interval.
pub const MAX_RECURRENCE_INTERVAL: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval: interval.clamp(1, MAX_RECURRENCE_INTERVAL),
            until: None,
        }
    }

    pub fn until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            frequency: fields.choice("frequency", Frequency::parse, Frequency::None),
            interval: fields.u32_in("interval", 1, MAX_RECURRENCE_INTERVAL, 1),
            until: fields.date("until"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub enabled: bool,
    pub offset_minutes: u32,
}

impl Reminder {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            enabled: fields.bool("enabled"),
            offset_minutes: fields.u32_in("offsetMinutes", 0, MAX_REMINDER_OFFSET_MINUTES, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub all_day: bool,
    pub color: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub reminder: Option<Reminder>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            date,
            start_time: None,
            end_time: None,
            all_day: true,
            color: None,
            recurrence: None,
            reminder: None,
            created_at: crate::model::fields::epoch(),
            updated_at: crate::model::fields::epoch(),
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Whether the event repeats at all.
    pub fn is_recurring(&self) -> bool {
        self.recurrence
            .is_some_and(|recurrence| recurrence.frequency != Frequency::None)
    }

    /// Events without a usable date are dropped.
    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        let date = fields.date("date")?;
        let start_time = fields.time("startTime");
        Some(Self {
            id,
            title: fields.string("title"),
            description: fields.string("description"),
            date,
            start_time,
            end_time: fields.time("endTime").filter(|end| start_time.map_or(true, |s| *end >= s)),
            all_day: fields.bool_or("allDay", start_time.is_none()),
            color: fields.opt_string("color"),
            recurrence: fields
                .object("recurrence")
                .map(|nested| Recurrence::from_fields(&nested)),
            reminder: fields
                .object("reminder")
                .map(|nested| Reminder::from_fields(&nested)),
            created_at: fields.created_at(),
            updated_at: fields.updated_at(),
        })
    }

    fn rederive_from(&mut self, _previous: &Self) {
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                self.end_time = None;
            }
        }
        if let Some(recurrence) = self.recurrence.as_mut() {
            recurrence.interval = recurrence.interval.clamp(1, MAX_RECURRENCE_INTERVAL);
        }
    }
}

impl_entity!(CalendarEvent, CalendarEvent, calendar_events, tracked, rederive);
impl Unordered for CalendarEvent {}
