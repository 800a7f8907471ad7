use chrono::NaiveDate;
use homebase_core::model::calendar::{CalendarEvent, Frequency, Recurrence};
use homebase_core::model::entity::Entity;
use homebase_core::{expand, normalize};
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event(id: &str, base: NaiveDate, recurrence: Option<Recurrence>) -> CalendarEvent {
    let mut event = CalendarEvent::new("Review", base);
    event.set_id(id.to_string());
    event.recurrence = recurrence;
    event
}

#[test]
fn biweekly_event_yields_four_dates_in_two_months() {
    let event = event(
        "e-weekly",
        date(2025, 1, 6),
        Some(Recurrence::new(Frequency::Weekly, 2)),
    );

    let occurrences = expand(&event, date(2025, 1, 1), date(2025, 2, 28)).collect::<Vec<_>>();

    let dates = occurrences.iter().map(|o| o.date()).collect::<Vec<_>>();
    assert_eq!(
        dates,
        vec![
            date(2025, 1, 6),
            date(2025, 1, 20),
            date(2025, 2, 3),
            date(2025, 2, 17)
        ]
    );
    assert!(occurrences.iter().all(|o| o.source_id == "e-weekly"));
    assert!(occurrences.iter().all(|o| o.event.title == "Review"));
}

#[test]
fn until_bounds_the_series() {
    let event = event(
        "e-daily",
        date(2025, 3, 1),
        Some(Recurrence::new(Frequency::Daily, 1).until(date(2025, 3, 3))),
    );

    let count = expand(&event, date(2025, 2, 1), date(2025, 12, 31)).count();

    assert_eq!(count, 3);
}

#[test]
fn single_event_yields_itself_only_inside_range() {
    let single = event("e-once", date(2025, 5, 5), None);

    let inside = expand(&single, date(2025, 5, 1), date(2025, 5, 31)).collect::<Vec<_>>();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].source_id, "e-once");
    assert_eq!(inside[0].date(), date(2025, 5, 5));

    assert_eq!(expand(&single, date(2025, 6, 1), date(2025, 6, 30)).count(), 0);
}

#[test]
fn monthly_series_clamps_to_month_end() {
    let event = event(
        "e-monthly",
        date(2025, 1, 31),
        Some(Recurrence::new(Frequency::Monthly, 1)),
    );

    let dates = expand(&event, date(2025, 1, 1), date(2025, 5, 31))
        .map(|o| o.date())
        .collect::<Vec<_>>();

    assert_eq!(
        dates,
        vec![
            date(2025, 1, 31),
            date(2025, 2, 28),
            date(2025, 3, 31),
            date(2025, 4, 30),
            date(2025, 5, 31)
        ]
    );
}

#[test]
fn occurrence_serializes_with_source_id() {
    let doc = normalize(&json!({
        "calendarEvents": [
            { "id": "e1", "title": "Yoga", "date": "2025-01-06",
              "recurrence": { "frequency": "weekly", "interval": 1 } }
        ]
    }));
    let event = doc.calendar_events.get("e1").unwrap();

    let first = expand(event, date(2025, 1, 13), date(2025, 1, 13))
        .next()
        .unwrap();
    let raw = serde_json::to_value(&first).unwrap();

    assert_eq!(raw["sourceId"], "e1");
    assert_eq!(raw["date"], "2025-01-13");
    assert_eq!(raw["title"], "Yoga");
}
