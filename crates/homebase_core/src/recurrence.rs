//! Read-side expansion of calendar events into dated occurrences.
//!
//! # Responsibility
//! - Turn one stored event plus its recurrence rule into the concrete dates
//!   that fall inside a query range.
//!
//! # Invariants
//! - Expansion never mutates the stored event.
//! - The n-th date is computed from the base date, not from the previous
//!   occurrence, so month-end clamping never drifts (Jan 31, Feb 28, Mar 31).
//! - The sequence is finite: it stops at `min(range_end, until)`.

use crate::model::calendar::{CalendarEvent, Frequency};
use crate::model::entity::Table;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// One dated instance of an event. Edits go to the event named by
/// `source_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub source_id: String,
    #[serde(flatten)]
    pub event: CalendarEvent,
}

impl Occurrence {
    fn of(event: &CalendarEvent, date: NaiveDate) -> Self {
        let mut copy = event.clone();
        copy.date = date;
        Self {
            source_id: event.id.clone(),
            event: copy,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.event.date
    }
}

/// Lazy occurrence sequence returned by [`expand`].
///
/// Cloning the iterator restarts from the cloned position.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    event: &'a CalendarEvent,
    frequency: Frequency,
    interval: u32,
    range_start: NaiveDate,
    last: NaiveDate,
    index: u32,
    exhausted: bool,
}

/// Expands `event` over the inclusive range `[range_start, range_end]`.
///
/// A non-recurring event yields itself when its date is in range, with
/// `source_id` equal to its own id.
pub fn expand(
    event: &CalendarEvent,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Occurrences<'_> {
    let (frequency, interval, until) = match event.recurrence {
        Some(recurrence) => (
            recurrence.frequency,
            recurrence.interval.max(1),
            recurrence.until,
        ),
        None => (Frequency::None, 1, None),
    };
    let last = match until {
        Some(until) if frequency != Frequency::None => until.min(range_end),
        _ => range_end,
    };

    let mut occurrences = Occurrences {
        event,
        frequency,
        interval,
        range_start,
        last,
        index: 0,
        exhausted: range_start > range_end || event.date > last,
    };
    occurrences.index = occurrences.first_candidate();
    occurrences
}

impl Occurrences<'_> {
    /// Date of step `n`, or `None` past the representable calendar.
    fn nth_date(&self, n: u32) -> Option<NaiveDate> {
        let base = self.event.date;
        let steps = n.checked_mul(self.interval)?;
        match self.frequency {
            Frequency::None => (n == 0).then_some(base),
            Frequency::Daily => base.checked_add_days(Days::new(u64::from(steps))),
            Frequency::Weekly => base.checked_add_days(Days::new(u64::from(steps) * 7)),
            Frequency::Monthly => base.checked_add_months(Months::new(steps)),
        }
    }

    /// First step index that can land on or after `range_start`, skipping
    /// whole steps before the range without visiting them.
    fn first_candidate(&self) -> u32 {
        let base = self.event.date;
        if self.range_start <= base {
            return 0;
        }
        let skipped = match self.frequency {
            Frequency::None => return 0,
            Frequency::Daily => (self.range_start - base).num_days() / i64::from(self.interval),
            Frequency::Weekly => {
                (self.range_start - base).num_days() / (7 * i64::from(self.interval))
            }
            Frequency::Monthly => {
                let months = (month_ordinal(self.range_start) - month_ordinal(base)).saturating_sub(1);
                months / i64::from(self.interval)
            }
        };
        u32::try_from(skipped.max(0)).unwrap_or(u32::MAX)
    }
}

fn month_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while !self.exhausted {
            let Some(date) = self.nth_date(self.index) else {
                self.exhausted = true;
                break;
            };
            if date > self.last {
                self.exhausted = true;
                break;
            }
            match self.index.checked_add(1) {
                Some(next) => self.index = next,
                None => self.exhausted = true,
            }
            if date >= self.range_start {
                return Some(Occurrence::of(self.event, date));
            }
        }
        None
    }
}

/// Every occurrence of every event in range, sorted by date, then start time,
/// then source id.
pub fn agenda(
    events: &Table<CalendarEvent>,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<Occurrence> {
    let mut occurrences = events
        .iter()
        .flat_map(|event| expand(event, range_start, range_end))
        .collect::<Vec<_>>();
    occurrences.sort_by(|left, right| {
        (left.date(), left.event.start_time, &left.source_id).cmp(&(
            right.date(),
            right.event.start_time,
            &right.source_id,
        ))
    });
    occurrences
}

#[cfg(test)]
mod tests {
    use super::expand;
    use crate::model::calendar::{CalendarEvent, Frequency, Recurrence};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn event(base: NaiveDate, recurrence: Option<Recurrence>) -> CalendarEvent {
        let mut event = CalendarEvent::new("Standup", base);
        event.id = "ev".to_string();
        event.recurrence = recurrence;
        event
    }

    #[test]
    fn daily_skip_ahead_lands_on_first_in_range_step() {
        let daily = event(date(2025, 1, 1), Some(Recurrence::new(Frequency::Daily, 3)));
        let dates = expand(&daily, date(2025, 3, 1), date(2025, 3, 8))
            .map(|occurrence| occurrence.date())
            .collect::<Vec<_>>();
        // Jan 1 + 3n: ..., Feb 27 (n=19), Mar 2, Mar 5, Mar 8
        assert_eq!(dates, vec![date(2025, 3, 2), date(2025, 3, 5), date(2025, 3, 8)]);
    }

    #[test]
    fn monthly_skip_ahead_keeps_month_end_clamping() {
        let monthly = event(date(2024, 1, 31), Some(Recurrence::new(Frequency::Monthly, 1)));
        let dates = expand(&monthly, date(2025, 2, 1), date(2025, 4, 30))
            .map(|occurrence| occurrence.date())
            .collect::<Vec<_>>();
        assert_eq!(dates, vec![date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]);
    }

    #[test]
    fn until_before_base_yields_nothing() {
        let rule = Recurrence::new(Frequency::Weekly, 1).until(date(2024, 12, 1));
        let weekly = event(date(2025, 1, 6), Some(rule));
        assert_eq!(expand(&weekly, date(2025, 1, 1), date(2025, 12, 31)).count(), 0);
    }

    #[test]
    fn clone_restarts_from_same_position() {
        let weekly = event(date(2025, 1, 6), Some(Recurrence::new(Frequency::Weekly, 1)));
        let mut occurrences = expand(&weekly, date(2025, 1, 1), date(2025, 1, 31));
        occurrences.next();
        let rest = occurrences.clone().count();
        assert_eq!(rest, 3);
        assert_eq!(occurrences.count(), 3);
    }
}
