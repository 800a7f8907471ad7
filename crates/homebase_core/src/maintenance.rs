//! Weekly planner reset, run once per load.
//!
//! Dated planner cards belong to the week they were planned for. When a new
//! week begins, cards whose date fell before it are purged; the undated
//! backlog is kept.

use crate::model::document::Document;
use crate::model::planner::Card;
use chrono::{Datelike, Days, NaiveDate};
use log::info;

/// Monday of the week containing `today`.
pub fn week_start_of(today: NaiveDate) -> NaiveDate {
    let offset = u64::from(today.weekday().num_days_from_monday());
    today.checked_sub_days(Days::new(offset)).unwrap_or(today)
}

/// Whether the weekly purge drops `card` for a week starting at `week_start`.
pub fn is_expired(card: &Card, week_start: NaiveDate) -> bool {
    card.has_date && card.date.map_or(true, |date| date < week_start)
}

/// Applies the weekly reset for `today`; returns the document and whether
/// anything changed.
pub fn maintain(mut doc: Document, today: NaiveDate) -> (Document, bool) {
    let current = week_start_of(today);
    match doc.settings.week_start {
        Some(stored) if stored == current => (doc, false),
        Some(stored) => {
            let purged = doc.cards.retain(|card| !is_expired(card, current));
            doc.settings.week_start = Some(current);
            info!(
                "event=weekly_maintenance module=maintenance status=purged previous_week={} week_start={} purged={}",
                stored, current, purged
            );
            (doc, true)
        }
        None => {
            doc.settings.week_start = Some(current);
            info!(
                "event=weekly_maintenance module=maintenance status=stamped week_start={}",
                current
            );
            (doc, true)
        }
    }
}
