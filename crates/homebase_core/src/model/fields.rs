//! Lenient field readers over raw JSON objects.
//!
//! # Responsibility
//! - Read one field of an untrusted record and coerce it to a canonical type.
//! - Substitute a default for absent, mistyped or out-of-range values.
//!
//! # Invariants
//! - No reader panics or fails; every reader returns a value.
//! - Reading a value that was produced by serializing a canonical entity yields
//!   that same value, which keeps normalization idempotent.

use crate::model::planner::ClockTime;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("valid date regex"));

/// Timestamp substituted when a record has none.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Parses a calendar date from `YYYY-MM-DD` or any ISO string starting with it.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_PREFIX_RE.captures(value.trim())?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an RFC 3339 timestamp, a bare date, or epoch milliseconds.
///
/// Instants outside years 0000-9999 are rejected: they have no four-digit
/// RFC 3339 form and would not read back.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                parse_date(text).map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
            }),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };
    parsed.filter(|instant| (0..=9999).contains(&instant.year()))
}

/// Borrowed view over one raw record.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    position: usize,
}

impl<'a> Fields<'a> {
    /// `position` is the record's index in its raw collection, used as the
    /// fallback `order`.
    pub fn new(map: &'a Map<String, Value>, position: usize) -> Self {
        Self { map, position }
    }

    /// Returns the raw value unless it is absent or `null`.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn string(&self, key: &str) -> String {
        self.string_or(key, "")
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.raw(key) {
            Some(Value::String(text)) => text.clone(),
            _ => default.to_string(),
        }
    }

    /// Non-empty string, or `None`.
    pub fn opt_string(&self, key: &str) -> Option<String> {
        match self.raw(key) {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        }
    }

    /// Id-like reference; numbers are accepted and stringified.
    pub fn reference(&self, key: &str) -> Option<String> {
        match self.raw(key) {
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => self.opt_string(key),
        }
    }

    pub fn bool(&self, key: &str) -> bool {
        self.bool_or(key, false)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.raw(key) {
            Some(Value::Bool(flag)) => *flag,
            _ => default,
        }
    }

    /// Finite number, or `None`.
    pub fn opt_number(&self, key: &str) -> Option<f64> {
        match self.raw(key) {
            Some(Value::Number(number)) => number.as_f64().filter(|value| value.is_finite()),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Finite, non-negative amount. Defaults to zero.
    pub fn amount(&self, key: &str) -> f64 {
        self.opt_number(key).filter(|value| *value >= 0.0).unwrap_or(0.0)
    }

    /// Integer clamped into `[min, max]`, or `default` when absent.
    pub fn u32_in(&self, key: &str, min: u32, max: u32, default: u32) -> u32 {
        match self.opt_number(key) {
            Some(value) => (value.trunc().max(f64::from(min)).min(f64::from(max))) as u32,
            None => default,
        }
    }

    /// Sibling order; defaults to the record position.
    pub fn order(&self) -> f64 {
        self.opt_number("order").unwrap_or(self.position as f64)
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.raw(key) {
            Some(Value::String(text)) => parse_date(text),
            _ => None,
        }
    }

    pub fn time(&self, key: &str) -> Option<ClockTime> {
        match self.raw(key) {
            Some(Value::String(text)) => ClockTime::parse(text),
            _ => None,
        }
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.raw(key).and_then(parse_timestamp)
    }

    /// `createdAt`, falling back to `updatedAt`, then the epoch.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamp("createdAt")
            .or_else(|| self.timestamp("updatedAt"))
            .unwrap_or_else(epoch)
    }

    /// `updatedAt`, falling back to the creation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamp("updatedAt").unwrap_or_else(|| self.created_at())
    }

    /// Distinct non-empty strings, first occurrence wins.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        if let Some(Value::Array(items)) = self.raw(key) {
            for item in items {
                let text = match item {
                    Value::String(text) if !text.trim().is_empty() => text.clone(),
                    Value::Number(number) => number.to_string(),
                    _ => continue,
                };
                if !out.contains(&text) {
                    out.push(text);
                }
            }
        }
        out
    }

    /// Nested object view; `None` when absent or not an object.
    pub fn object(&self, key: &str) -> Option<Fields<'a>> {
        match self.raw(key) {
            Some(Value::Object(map)) => Some(Fields::new(map, self.position)),
            _ => None,
        }
    }

    /// Reads a string and maps it through `parse`, falling back to `default`.
    pub fn choice<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>, default: T) -> T {
        match self.raw(key) {
            Some(Value::String(text)) => parse(text.trim()).unwrap_or(default),
            _ => default,
        }
    }
}
