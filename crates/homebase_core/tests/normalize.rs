use homebase_core::model::planner::{Day, Period};
use homebase_core::normalize::migrations::latest_version;
use homebase_core::{normalize, Document};
use serde_json::{json, Value};

fn canonical(raw: &Value) -> Value {
    serde_json::to_value(normalize(raw)).unwrap()
}

fn assert_idempotent(raw: Value) {
    let once = canonical(&raw);
    let twice = canonical(&once);
    assert_eq!(once, twice);
}

fn legacy_v0_document() -> Value {
    json!({
        "theme": { "background": "#000000", "accent": "#16A34A" },
        "cards": [
            { "id": "c1", "title": "Gym", "day": "fri", "period": "morning",
              "hasDate": true, "date": "2025-01-08", "order": 2 },
            { "id": "c2", "title": "Someday", "hasDate": false, "date": "2025-01-09" }
        ],
        "calendarEvents": [
            { "id": "e1", "title": "Standup", "date": "2025-01-06", "time": "09:30",
              "repeat": "weekly", "repeatInterval": 1, "reminderMinutes": 10 }
        ],
        "shortcuts": [
            { "id": "s1", "name": "Docs", "type": "link", "url": "https://example.com" },
            { "id": "s2", "name": "Home", "type": "path", "path": "/home/me" },
            { "id": "s3", "type": "clipboard", "content": "hello" },
            { "id": "s4", "type": "widget" }
        ],
        "habits": [ { "id": "h1", "name": "Read" } ],
        "habitEntries": [
            { "id": "he1", "habitId": "h1", "date": "2025-01-06" },
            { "id": "he2", "habitId": "missing", "date": "2025-01-06" }
        ]
    })
}

#[test]
fn normalize_of_null_and_empty_object_is_empty_document() {
    assert_eq!(normalize(&Value::Null), Document::empty());
    assert_eq!(normalize(&json!({})), Document::empty());
    assert_eq!(normalize(&json!([1, 2, 3])), Document::empty());
}

#[test]
fn normalize_is_idempotent() {
    assert_idempotent(Value::Null);
    assert_idempotent(json!({}));
    assert_idempotent(legacy_v0_document());
    assert_idempotent(json!({
        "version": latest_version(),
        "cards": [ { "title": "no id" }, { "title": "no id either" } ],
        "crmContacts": [ { "id": "k1", "name": "Ada", "stage": "bogus", "tags": ["t?"] } ]
    }));
    assert_idempotent(json!({
        "version": latest_version(),
        "habits": [
            { "id": "far-future", "name": "Read", "createdAt": 300000000000000i64 },
            { "id": "far-past", "name": "Run", "createdAt": -100000000000000i64,
              "updatedAt": 300000000000000i64 }
        ]
    }));
}

#[test]
fn normalize_is_total_on_malformed_input() {
    let inputs = [
        json!("just a string"),
        json!(42),
        json!({ "cards": "not a list", "notes": 7, "settings": [] }),
        json!({ "cards": [null, 1, "x", [], { "location": "nowhere", "order": "first" }] }),
        json!({ "calendarEvents": [ { "id": "e", "date": "not-a-date" } ] }),
        json!({ "noteFolders": [ { "id": "a", "parentId": "b" }, { "id": "b", "parentId": "a" } ] }),
        json!({ "version": -3, "theme": 12 }),
        json!({ "settings": { "backupIntervalDays": 100000, "weekStart": "yesterday" } }),
    ];
    for input in inputs {
        let doc = normalize(&input);
        assert_eq!(doc.version, latest_version());
        assert_eq!(canonical(&serde_json::to_value(&doc).unwrap()), serde_json::to_value(&doc).unwrap());
    }
}

#[test]
fn corrupt_collection_does_not_lose_other_collections() {
    let doc = normalize(&json!({
        "cards": { "oops": true },
        "habits": [ { "id": "h1", "name": "Read" } ]
    }));
    assert!(doc.cards.is_empty());
    assert_eq!(doc.habits.len(), 1);
}

#[test]
fn legacy_document_is_migrated_to_current_shape() {
    let doc = normalize(&legacy_v0_document());

    assert_eq!(doc.version, latest_version());
    assert_eq!(doc.settings.theme, "forest");

    assert_eq!(doc.shortcuts.len(), 1);
    assert_eq!(doc.shortcuts.get("s1").unwrap().target, "https://example.com");
    assert_eq!(doc.paths.get("s2").unwrap().path, "/home/me");
    assert_eq!(doc.clipboard_items.get("s3").unwrap().content, "hello");
    assert!(doc.shortcuts.get("s4").is_none());

    let gym = doc.cards.get("c1").unwrap();
    assert_eq!(gym.location.day, Some(Day::Wed));
    assert_eq!(gym.location.period, Some(Period::Morning));
    let someday = doc.cards.get("c2").unwrap();
    assert!(!someday.has_date);
    assert_eq!(someday.date, None);

    let standup = doc.calendar_events.get("e1").unwrap();
    assert!(standup.is_recurring());
    assert_eq!(standup.start_time.map(|time| time.to_string()).as_deref(), Some("09:30"));
    let reminder = standup.reminder.unwrap();
    assert!(reminder.enabled);
    assert_eq!(reminder.offset_minutes, 10);

    assert_eq!(doc.habit_entries.len(), 1);
}

#[test]
fn optional_fields_serialize_as_null() {
    let raw = canonical(&json!({
        "calendarEvents": [ { "id": "e1", "title": "Lunch", "date": "2025-01-06" } ]
    }));
    let event = &raw["calendarEvents"][0];
    assert!(event.as_object().unwrap().contains_key("reminder"));
    assert_eq!(event["reminder"], Value::Null);
    assert_eq!(event["recurrence"], Value::Null);
}

#[test]
fn missing_and_duplicate_ids_are_resolved_deterministically() {
    let raw = json!({
        "habits": [
            { "name": "first" },
            { "id": "dup", "name": "kept" },
            { "id": "dup", "name": "dropped" }
        ]
    });
    let first = normalize(&raw);
    let second = normalize(&raw);
    assert_eq!(first, second);
    assert_eq!(first.habits.len(), 2);
    assert_eq!(first.habits.get("dup").unwrap().name, "kept");
}

#[test]
fn newer_document_version_is_revived_without_migrating() {
    let doc = normalize(&json!({
        "version": latest_version() + 5,
        "habits": [ { "id": "h1", "name": "Read" } ]
    }));
    assert_eq!(doc.version, latest_version());
    assert_eq!(doc.habits.len(), 1);
}
