//! Weekly planner items ("cards").
//!
//! # Responsibility
//! - Define the planner cell address (`Location`) and the card record.
//! - Own the date/cell and time/period consistency rules.
//!
//! # Invariants
//! - `has_date == false` implies `date == None`.
//! - A dated card placed on a weekday sits on the weekday of its date.
//! - Setting `time` moves a card placed in a cell into the matching period.

use crate::model::entity::{impl_entity, ContainerKey, Ordered};
use crate::model::fields::Fields;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Hour at which `afternoon` starts.
pub const AFTERNOON_STARTS_AT: u8 = 12;
/// Hour at which `night` starts.
pub const NIGHT_STARTS_AT: u8 = 18;

static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2}(?:\.\d+)?)?$").expect("valid clock time regex")
});

/// Planner weekday column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Some(Self::Mon),
            "tue" | "tuesday" => Some(Self::Tue),
            "wed" | "wednesday" => Some(Self::Wed),
            "thu" | "thursday" => Some(Self::Thu),
            "fri" | "friday" => Some(Self::Fri),
            "sat" | "saturday" => Some(Self::Sat),
            "sun" | "sunday" => Some(Self::Sun),
            _ => None,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    /// Days since Monday.
    pub fn index(self) -> i64 {
        i64::from(chrono::Weekday::from(self).num_days_from_monday())
    }
}

impl From<chrono::Weekday> for Day {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Mon,
            chrono::Weekday::Tue => Self::Tue,
            chrono::Weekday::Wed => Self::Wed,
            chrono::Weekday::Thu => Self::Thu,
            chrono::Weekday::Fri => Self::Fri,
            chrono::Weekday::Sat => Self::Sat,
            chrono::Weekday::Sun => Self::Sun,
        }
    }
}

impl From<Day> for chrono::Weekday {
    fn from(value: Day) -> Self {
        match value {
            Day::Mon => chrono::Weekday::Mon,
            Day::Tue => chrono::Weekday::Tue,
            Day::Wed => chrono::Weekday::Wed,
            Day::Thu => chrono::Weekday::Thu,
            Day::Fri => chrono::Weekday::Fri,
            Day::Sat => chrono::Weekday::Sat,
            Day::Sun => chrono::Weekday::Sun,
        }
    }
}

/// Planner period row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
    Night,
}

impl Period {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "night" | "evening" => Some(Self::Night),
            _ => None,
        }
    }

    /// Bucket for a time of day.
    pub fn for_time(time: ClockTime) -> Self {
        if time.hour < AFTERNOON_STARTS_AT {
            Self::Morning
        } else if time.hour < NIGHT_STARTS_AT {
            Self::Afternoon
        } else {
            Self::Night
        }
    }
}

/// 24-hour `HH:MM` time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn parse(value: &str) -> Option<Self> {
        let caps = CLOCK_TIME_RE.captures(value.trim())?;
        let hour = caps[1].parse::<u8>().ok()?;
        let minute = caps[2].parse::<u8>().ok()?;
        Self::new(hour, minute)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time `{text}`")))
    }
}

/// Planner cell address. `(None, None)` is the backlog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub day: Option<Day>,
    pub period: Option<Period>,
}

impl Location {
    pub const BACKLOG: Location = Location {
        day: None,
        period: None,
    };

    pub fn cell(day: Day, period: Period) -> Self {
        Self {
            day: Some(day),
            period: Some(period),
        }
    }

    pub fn is_backlog(&self) -> bool {
        self.day.is_none() && self.period.is_none()
    }

    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            day: fields.choice("day", |v| Day::parse(v).map(Some), None),
            period: fields.choice("period", |v| Period::parse(v).map(Some), None),
        }
    }
}

/// Planner item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub order: f64,
    pub has_date: bool,
    pub date: Option<NaiveDate>,
    pub time: Option<ClockTime>,
    pub project_id: Option<String>,
    pub color: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Draft for `Repository::append`; id, order and timestamps are assigned there.
    pub fn new(title: impl Into<String>, location: Location) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            location,
            order: 0.0,
            has_date: false,
            date: None,
            time: None,
            project_id: None,
            color: None,
            completed: false,
            created_at: crate::model::fields::epoch(),
            updated_at: crate::model::fields::epoch(),
        }
    }

    /// Sets a concrete date, turning the card into a dated item.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.has_date = true;
        self.date = Some(date);
        self
    }

    pub fn with_time(mut self, time: ClockTime) -> Self {
        self.time = Some(time);
        self
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        let location = fields
            .object("location")
            .map(|nested| Location::from_fields(&nested))
            .unwrap_or_default();
        let mut card = Self {
            id,
            title: fields.string("title"),
            description: fields.string("description"),
            location,
            order: fields.order(),
            has_date: fields.bool("hasDate"),
            date: fields.date("date"),
            time: fields.time("time"),
            project_id: fields.reference("projectId"),
            color: fields.opt_string("color"),
            completed: fields.bool("completed"),
            created_at: fields.created_at(),
            updated_at: fields.updated_at(),
        };
        card.enforce_date_invariant();
        Some(card)
    }

    /// Clears stray dates and aligns the cell weekday with the date.
    pub fn enforce_date_invariant(&mut self) {
        if !self.has_date {
            self.date = None;
            return;
        }
        if let (Some(date), Some(_)) = (self.date, self.location.day) {
            self.location.day = Some(Day::of(date));
        }
    }

    /// Moves a card placed in a cell into the period bucket of its time.
    pub fn align_period_with_time(&mut self) {
        if let (Some(time), Some(_)) = (self.time, self.location.day) {
            let period = Period::for_time(time);
            if self.location.period != Some(period) {
                self.location.period = Some(period);
            }
        }
    }

    fn rederive_from(&mut self, previous: &Self) {
        if self.time.is_some() && self.time != previous.time {
            self.align_period_with_time();
        }
        self.enforce_date_invariant();
    }
}

impl_entity!(Card, Card, cards, tracked, rederive);

impl Ordered for Card {
    fn container(&self) -> ContainerKey {
        ContainerKey::Planner(self.location)
    }

    fn order(&self) -> f64 {
        self.order
    }

    fn set_order(&mut self, order: f64) {
        self.order = order;
    }
}
