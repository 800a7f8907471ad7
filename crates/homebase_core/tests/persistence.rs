use chrono::{Duration, NaiveDate, TimeZone, Utc};
use homebase_core::model::habits::Habit;
use homebase_core::normalize::migrations::latest_version;
use homebase_core::{
    Document, JsonFileStore, ManualClock, MemoryStore, PersistenceGateway, RawStore,
    SqliteDocumentStore, Store, StoreConfig, StoreError,
};
use rusqlite::Connection;
use serde_json::json;
use std::sync::Arc;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 8, 9, 0, 0).unwrap())
}

fn open_memory() -> (Store<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
    let memory = MemoryStore::new();
    let clock = clock();
    let mut store = Store::open(memory.clone(), clock.clone(), &StoreConfig::default());
    assert!(store.flush());
    (store, memory, clock)
}

#[test]
fn burst_of_mutations_is_written_once_with_latest_document() {
    let (mut store, memory, clock) = open_memory();
    let writes = memory.writes();

    for name in ["Read", "Run", "Swim"] {
        store.mutate(|repo| repo.append(Habit::new(name))).unwrap();
        clock.advance(Duration::milliseconds(100));
        assert!(!store.tick());
    }
    assert_eq!(memory.writes(), writes);

    clock.advance(Duration::milliseconds(200));
    assert!(store.tick());
    assert_eq!(memory.writes(), writes + 1);
    let saved = memory.value().unwrap();
    assert_eq!(saved["habits"].as_array().unwrap().len(), 3);
    assert!(!store.has_pending_write());
}

#[test]
fn unchanged_mutation_schedules_no_write() {
    let (mut store, _, _) = open_memory();

    store.mutate(|_| Ok(())).unwrap();

    assert!(!store.has_pending_write());
}

#[test]
fn write_failure_is_observable_and_snapshot_is_kept() {
    let (mut store, memory, clock) = open_memory();
    memory.fail_writes(true);

    let id = store.mutate(|repo| repo.append(Habit::new("Read"))).unwrap();
    clock.advance(Duration::milliseconds(300));
    assert!(store.tick());

    assert!(matches!(
        store.persistence_error(),
        Some(StoreError::Unavailable(_))
    ));
    assert!(store.snapshot().habits.get(&id).is_some());

    memory.fail_writes(false);
    store.mutate(|repo| repo.append(Habit::new("Run"))).unwrap();
    assert!(store.flush());
    assert!(store.persistence_error().is_none());
    assert_eq!(memory.value().unwrap()["habits"].as_array().unwrap().len(), 2);
}

#[test]
fn close_reports_final_write_failure() {
    let (mut store, memory, _) = open_memory();
    store.mutate(|repo| repo.append(Habit::new("Read"))).unwrap();
    memory.fail_writes(true);

    let result = store.close();

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[test]
fn cancel_pending_drops_the_write() {
    let memory = MemoryStore::new();
    let mut gateway = PersistenceGateway::new(memory.clone(), std::time::Duration::from_millis(300));
    let t0 = Utc.with_ymd_and_hms(2025, 1, 8, 9, 0, 0).unwrap();

    gateway.save(Arc::new(Document::empty()), t0);
    assert_eq!(gateway.pending_due(), Some(t0 + Duration::milliseconds(300)));
    assert!(gateway.cancel_pending());

    assert!(!gateway.poll(t0 + Duration::seconds(5)));
    assert_eq!(memory.writes(), 0);
}

#[test]
fn load_recovers_from_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("homebase.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut gateway = PersistenceGateway::new(JsonFileStore::new(&path), std::time::Duration::ZERO);
    let t0 = Utc.with_ymd_and_hms(2025, 1, 8, 9, 0, 0).unwrap();
    let doc = gateway.load(t0, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());

    assert!(doc.cards.is_empty());
    assert_eq!(doc.version, latest_version());
    assert!(gateway.has_pending());
}

#[test]
fn load_runs_weekly_maintenance_and_schedules_write() {
    let memory = MemoryStore::with_value(json!({
        "version": latest_version(),
        "settings": { "weekStart": "2024-12-30" },
        "cards": [
            { "id": "old", "hasDate": true, "date": "2025-01-02" },
            { "id": "keep", "hasDate": false }
        ]
    }));
    let store = Store::open(memory.clone(), clock(), &StoreConfig::default());

    let snapshot = store.snapshot();
    assert!(snapshot.cards.get("old").is_none());
    assert!(snapshot.cards.get("keep").is_some());
    assert!(store.has_pending_write());
    store.close().unwrap();
    assert_eq!(memory.value().unwrap()["settings"]["weekStart"], "2025-01-06");
}

#[test]
fn json_file_store_round_trips_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("homebase.json");

    let mut store = Store::open(JsonFileStore::new(&path), clock(), &StoreConfig::default());
    let id = store.mutate(|repo| repo.append(Habit::new("Read"))).unwrap();
    store.close().unwrap();

    assert!(path.exists());
    assert!(!path.with_file_name("homebase.json.tmp").exists());
    let reopened = Store::open(JsonFileStore::new(&path), clock(), &StoreConfig::default());
    assert_eq!(reopened.snapshot().habits.get(&id).unwrap().name, "Read");
}

#[test]
fn sqlite_store_persists_document_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("homebase.db");

    let mut store = Store::open(
        SqliteDocumentStore::open(&path).unwrap(),
        clock(),
        &StoreConfig::default(),
    );
    let id = store.mutate(|repo| repo.append(Habit::new("Read"))).unwrap();
    let raw = store.close().unwrap();
    assert_eq!(raw.stored_schema_version().unwrap(), Some(latest_version()));
    drop(raw);

    let mut reopened = SqliteDocumentStore::open(&path).unwrap();
    let loaded = reopened.load_raw().unwrap().unwrap();
    assert_eq!(loaded["habits"][0]["id"], json!(id));
}

#[test]
fn sqlite_store_rejects_newer_container_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteDocumentStore::open(&path) {
        Err(StoreError::Db(_)) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer database must not open"),
    }
}

#[test]
fn empty_stores_load_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = JsonFileStore::new(dir.path().join("missing.json"));
    let mut sqlite = SqliteDocumentStore::open_in_memory().unwrap();
    let mut memory = MemoryStore::new();

    assert!(file.load_raw().unwrap().is_none());
    assert!(sqlite.load_raw().unwrap().is_none());
    assert!(memory.load_raw().unwrap().is_none());
}
