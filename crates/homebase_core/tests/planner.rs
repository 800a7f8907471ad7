use chrono::{NaiveDate, TimeZone, Utc};
use homebase_core::model::entity::ContainerKey;
use homebase_core::model::habits::Habit;
use homebase_core::model::planner::{Card, ClockTime, Day, Location, Period};
use homebase_core::ordering::sorted_members;
use homebase_core::{maintain, Document, RepoError, Repository};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_repo(doc: &mut Document) -> Repository<'_> {
    Repository::new(doc, Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap())
}

#[test]
fn setting_date_and_time_rewrites_cell() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);
    let id = repo
        .append(Card::new("Dentist", Location::cell(Day::Fri, Period::Morning)))
        .unwrap();

    repo.update::<Card>(&id, |card| {
        card.has_date = true;
        card.date = Some(date(2025, 1, 8));
    })
    .unwrap();
    assert_eq!(repo.get::<Card>(&id).unwrap().location.day, Some(Day::Wed));

    repo.update::<Card>(&id, |card| card.time = ClockTime::parse("19:30"))
        .unwrap();
    let card = repo.get::<Card>(&id).unwrap();
    assert_eq!(card.location, Location::cell(Day::Wed, Period::Night));
}

#[test]
fn clearing_has_date_drops_the_date() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);
    let id = repo
        .append(Card::new("Call", Location::cell(Day::Mon, Period::Afternoon)).with_date(date(2025, 1, 6)))
        .unwrap();

    repo.update::<Card>(&id, |card| card.has_date = false).unwrap();

    assert_eq!(repo.get::<Card>(&id).unwrap().date, None);
}

#[test]
fn update_cannot_change_id() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);
    let id = repo.append(Card::new("Keep", Location::BACKLOG)).unwrap();

    repo.update::<Card>(&id, |card| card.id = "hijacked".to_string())
        .unwrap();

    assert!(repo.get::<Card>(&id).is_some());
    assert!(repo.get::<Card>("hijacked").is_none());
}

#[test]
fn move_card_keeps_week_and_applies_order() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);
    let wednesday = Location::cell(Day::Wed, Period::Morning);
    let friday = Location::cell(Day::Fri, Period::Morning);
    let dated = repo
        .append(Card::new("Review", wednesday).with_date(date(2025, 1, 8)))
        .unwrap();
    let resident = repo.append(Card::new("Standup", friday)).unwrap();

    repo.move_card(&dated, friday, &[dated.clone(), resident.clone()])
        .unwrap();

    let moved = repo.get::<Card>(&dated).unwrap();
    assert_eq!(moved.location, friday);
    assert_eq!(moved.date, Some(date(2025, 1, 10)));
    let order = sorted_members(&repo.document().cards, &ContainerKey::Planner(friday))
        .into_iter()
        .map(|card| card.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(order, vec![dated, resident]);
}

#[test]
fn weekly_purge_drops_only_past_dated_cards() {
    let mut doc = Document::empty();
    doc.settings.week_start = Some(date(2024, 12, 30));
    let (past, undated, current) = {
        let mut repo = open_repo(&mut doc);
        let past = repo
            .append(Card::new("Old", Location::cell(Day::Thu, Period::Morning)).with_date(date(2025, 1, 2)))
            .unwrap();
        let mut draft = Card::new("Backlog", Location::cell(Day::Thu, Period::Morning));
        draft.date = Some(date(2025, 1, 2));
        let undated = repo.append(draft).unwrap();
        let current = repo
            .append(Card::new("This week", Location::cell(Day::Tue, Period::Morning)).with_date(date(2025, 1, 7)))
            .unwrap();
        (past, undated, current)
    };

    let (doc, changed) = maintain(doc, date(2025, 1, 8));

    assert!(changed);
    assert_eq!(doc.settings.week_start, Some(date(2025, 1, 6)));
    assert!(doc.cards.get(&past).is_none());
    assert!(doc.cards.get(&undated).is_some());
    assert!(doc.cards.get(&current).is_some());
}

#[test]
fn weekly_purge_drops_dated_cards_without_date() {
    let mut doc = Document::empty();
    doc.settings.week_start = Some(date(2024, 12, 30));
    let id = {
        let mut repo = open_repo(&mut doc);
        let mut draft = Card::new("Broken", Location::BACKLOG);
        draft.has_date = true;
        repo.append(draft).unwrap()
    };

    let (doc, _) = maintain(doc, date(2025, 1, 8));

    assert!(doc.cards.get(&id).is_none());
}

#[test]
fn habit_toggle_flips_single_entry() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);
    let habit = repo.append(Habit::new("Read")).unwrap();

    assert!(repo.toggle_habit_entry(&habit, date(2025, 1, 6)).unwrap());
    assert_eq!(repo.document().habit_entries.len(), 1);
    assert!(!repo.toggle_habit_entry(&habit, date(2025, 1, 6)).unwrap());
    assert!(repo.document().habit_entries.is_empty());
}

#[test]
fn settings_edits_are_validated() {
    let mut doc = Document::empty();
    let mut repo = open_repo(&mut doc);

    repo.update_settings(|settings| settings.theme = "forest".to_string())
        .unwrap();
    let err = repo
        .update_settings(|settings| settings.theme = "neon".to_string())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidInput(_)));
    let err = repo
        .update_settings(|settings| settings.backup_interval_days = 0)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidInput(_)));

    assert_eq!(repo.document().settings.theme, "forest");
}
