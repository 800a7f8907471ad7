use chrono::{NaiveDate, TimeZone, Utc};
use homebase_core::model::crm::{CrmContact, CrmInteraction, CrmTag, InteractionKind, LinkKind};
use homebase_core::model::habits::{Habit, HabitEntry, StudySession, StudySubject};
use homebase_core::model::notes::{Note, NoteFolder};
use homebase_core::model::planner::{Card, Location};
use homebase_core::model::projects::{App, Ide, Macro, Project};
use homebase_core::model::shortcuts::{
    ClipboardCategory, ClipboardItem, Shortcut, ShortcutFolder,
};
use homebase_core::{
    Document, EntityKind, ManualClock, MemoryStore, RepoError, Repository, Store, StoreConfig,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn with_repo<T>(doc: &mut Document, op: impl FnOnce(&mut Repository<'_>) -> T) -> T {
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
    let mut repo = Repository::new(doc, now);
    op(&mut repo)
}

#[test]
fn removing_shortcut_folder_detaches_all_children() {
    let mut doc = Document::empty();
    let (folder, children, subfolder) = with_repo(&mut doc, |repo| {
        let folder = repo.append(ShortcutFolder::new("Work", None)).unwrap();
        let children = (0..3)
            .map(|n| {
                repo.append(Shortcut::new(format!("s{n}"), "https://x.example").in_folder(folder.clone()))
                    .unwrap()
            })
            .collect::<Vec<_>>();
        let subfolder = repo
            .append(ShortcutFolder::new("Sub", Some(folder.clone())))
            .unwrap();
        repo.remove::<ShortcutFolder>(&folder).unwrap();
        (folder, children, subfolder)
    });

    assert!(doc.shortcut_folders.get(&folder).is_none());
    assert_eq!(doc.shortcuts.len(), 3);
    for child in &children {
        assert_eq!(doc.shortcuts.get(child).unwrap().folder_id, None);
    }
    assert_eq!(doc.shortcut_folders.get(&subfolder).unwrap().parent_id, None);
}

#[test]
fn removing_note_folder_detaches_notes() {
    let mut doc = Document::empty();
    let (folder, note) = with_repo(&mut doc, |repo| {
        let folder = repo.append(NoteFolder::new("Journal", None)).unwrap();
        let note = repo
            .append(Note::new("Monday", "body").in_folder(folder.clone()))
            .unwrap();
        repo.remove::<NoteFolder>(&folder).unwrap();
        (folder, note)
    });

    assert!(doc.note_folders.get(&folder).is_none());
    assert_eq!(doc.notes.get(&note).unwrap().folder_id, None);
}

#[test]
fn removing_project_clears_cards_notes_and_contact_links() {
    let mut doc = Document::empty();
    let (card, note, contact) = with_repo(&mut doc, |repo| {
        let project = repo.append(Project::new("Homebase")).unwrap();
        let mut draft = Card::new("Ship", Location::BACKLOG);
        draft.project_id = Some(project.clone());
        let card = repo.append(draft).unwrap();
        let mut draft = Note::new("Plan", "");
        draft.project_id = Some(project.clone());
        let note = repo.append(draft).unwrap();
        let contact = repo.append(CrmContact::new("Ada")).unwrap();
        repo.link_contact(&contact, LinkKind::Project, &project).unwrap();

        repo.remove::<Project>(&project).unwrap();
        (card, note, contact)
    });

    assert_eq!(doc.cards.get(&card).unwrap().project_id, None);
    assert_eq!(doc.notes.get(&note).unwrap().project_id, None);
    assert!(doc.crm_contacts.get(&contact).unwrap().links.project_ids.is_empty());
}

#[test]
fn removing_ide_and_app_updates_projects_and_macros() {
    let mut doc = Document::empty();
    let (project, macro_id, kept_app) = with_repo(&mut doc, |repo| {
        let ide = repo.add(Ide::new("Editor", "edit")).unwrap();
        let app = repo.add(App::new("Browser", "/usr/bin/browser")).unwrap();
        let kept_app = repo.add(App::new("Term", "/usr/bin/term")).unwrap();
        let mut draft = Project::new("Homebase");
        draft.preferred_ide_id = Some(ide.clone());
        let project = repo.append(draft).unwrap();
        let macro_id = repo
            .append(Macro::new("Morning", vec![app.clone(), kept_app.clone()]))
            .unwrap();

        repo.remove::<Ide>(&ide).unwrap();
        repo.remove::<App>(&app).unwrap();
        (project, macro_id, kept_app)
    });

    assert_eq!(doc.projects.get(&project).unwrap().preferred_ide_id, None);
    assert_eq!(doc.macros.get(&macro_id).unwrap().app_ids, vec![kept_app]);
}

#[test]
fn removing_habit_and_subject_deletes_their_entries() {
    let mut doc = Document::empty();
    with_repo(&mut doc, |repo| {
        let habit = repo.append(Habit::new("Read")).unwrap();
        let other = repo.append(Habit::new("Run")).unwrap();
        for d in 6..9 {
            repo.add(HabitEntry::new(habit.clone(), day(d))).unwrap();
        }
        repo.add(HabitEntry::new(other.clone(), day(6))).unwrap();
        let subject = repo.append(StudySubject::new("Rust")).unwrap();
        repo.add(StudySession::new(subject.clone(), day(6), 45)).unwrap();

        repo.remove::<Habit>(&habit).unwrap();
        repo.remove::<StudySubject>(&subject).unwrap();
    });

    assert_eq!(doc.habit_entries.len(), 1);
    assert!(doc.study_sessions.is_empty());
}

#[test]
fn removing_contact_deletes_all_interactions() {
    let mut doc = Document::empty();
    let contact = with_repo(&mut doc, |repo| {
        let contact = repo.append(CrmContact::new("Ada")).unwrap();
        let other = repo.append(CrmContact::new("Grace")).unwrap();
        for _ in 0..4 {
            repo.add(CrmInteraction::new(contact.clone(), InteractionKind::Call))
                .unwrap();
        }
        repo.add(CrmInteraction::new(other, InteractionKind::Email))
            .unwrap();
        repo.remove::<CrmContact>(&contact).unwrap();
        contact
    });

    assert!(doc
        .crm_interactions
        .iter()
        .all(|interaction| interaction.contact_id != contact));
    assert_eq!(doc.crm_interactions.len(), 1);
}

#[test]
fn removing_tag_category_and_linked_rows_cleans_references() {
    let mut doc = Document::empty();
    let (contact, item) = with_repo(&mut doc, |repo| {
        let tag = repo.add(CrmTag::new("vip")).unwrap();
        let contact = repo.append(CrmContact::new("Ada")).unwrap();
        repo.tag_contact(&contact, &tag).unwrap();

        let note = repo.append(Note::new("Minutes", "")).unwrap();
        let card = repo.append(Card::new("Call back", Location::BACKLOG)).unwrap();
        repo.link_contact(&contact, LinkKind::Note, &note).unwrap();
        repo.link_contact(&contact, LinkKind::Card, &card).unwrap();
        repo.link_contact(&contact, LinkKind::File, "/tmp/contract.pdf")
            .unwrap();

        let category = repo.append(ClipboardCategory::new("Snippets")).unwrap();
        let item = repo
            .append(ClipboardItem::new("hello").in_category(category.clone()))
            .unwrap();

        repo.remove::<CrmTag>(&tag).unwrap();
        repo.remove::<Note>(&note).unwrap();
        repo.remove::<Card>(&card).unwrap();
        repo.remove::<ClipboardCategory>(&category).unwrap();
        (contact, item)
    });

    let contact = doc.crm_contacts.get(&contact).unwrap();
    assert!(contact.tags.is_empty());
    assert!(contact.links.note_ids.is_empty());
    assert!(contact.links.card_ids.is_empty());
    assert_eq!(contact.links.file_ids, vec!["/tmp/contract.pdf".to_string()]);
    assert_eq!(doc.clipboard_items.get(&item).unwrap().category_id, None);
}

#[test]
fn removing_missing_row_reports_not_found() {
    let mut doc = Document::empty();
    let err = with_repo(&mut doc, |repo| repo.remove::<Habit>("nope").unwrap_err());
    assert_eq!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Habit,
            id: "nope".to_string()
        }
    );
}

#[test]
fn adding_entry_for_missing_owner_is_rejected() {
    let mut doc = Document::empty();
    let err = with_repo(&mut doc, |repo| {
        repo.add(HabitEntry::new("ghost", day(6))).unwrap_err()
    });
    assert!(matches!(err, RepoError::NotFound { kind: EntityKind::Habit, .. }));
    assert!(doc.habit_entries.is_empty());
}

#[test]
fn folder_cycle_is_rejected_and_document_unchanged() {
    let clock = ManualClock::at_date(day(8));
    let mut store = Store::open(MemoryStore::new(), clock, &StoreConfig::default());

    let (a, c) = store
        .mutate(|repo| {
            let a = repo.append(NoteFolder::new("A", None))?;
            let b = repo.append(NoteFolder::new("B", Some(a.clone())))?;
            let c = repo.append(NoteFolder::new("C", Some(b)))?;
            Ok((a, c))
        })
        .unwrap();
    let before = store.snapshot();

    let err = store
        .mutate(|repo| repo.move_note_folder(&a, Some(c.as_str())))
        .unwrap_err();
    assert!(matches!(err, RepoError::CycleDetected { .. }));
    assert_eq!(*store.snapshot(), *before);

    let err = store
        .mutate(|repo| repo.move_note_folder(&a, Some(a.as_str())))
        .unwrap_err();
    assert!(matches!(err, RepoError::CycleDetected { .. }));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn folder_can_move_to_sibling_branch() {
    let mut doc = Document::empty();
    let (left, right) = with_repo(&mut doc, |repo| {
        let left = repo.append(ShortcutFolder::new("Left", None)).unwrap();
        let right = repo.append(ShortcutFolder::new("Right", None)).unwrap();
        repo.move_shortcut_folder(&right, Some(left.as_str())).unwrap();
        (left, right)
    });
    assert_eq!(
        doc.shortcut_folders.get(&right).unwrap().parent_id.as_deref(),
        Some(left.as_str())
    );
}

#[test]
fn folder_parent_edit_through_update_is_cycle_checked() {
    let clock = ManualClock::at_date(day(8));
    let mut store = Store::open(MemoryStore::new(), clock, &StoreConfig::default());
    let (a, b) = store
        .mutate(|repo| {
            let a = repo.append(ShortcutFolder::new("A", None))?;
            let b = repo.append(ShortcutFolder::new("B", Some(a.clone())))?;
            Ok((a, b))
        })
        .unwrap();
    let before = store.snapshot();

    let err = store
        .mutate(|repo| repo.update::<ShortcutFolder>(&a, |folder| folder.parent_id = Some(b.clone())))
        .unwrap_err();
    assert!(matches!(err, RepoError::CycleDetected { .. }));
    let err = store
        .mutate(|repo| repo.update::<ShortcutFolder>(&a, |folder| folder.parent_id = Some(a.clone())))
        .unwrap_err();
    assert!(matches!(err, RepoError::CycleDetected { .. }));
    let err = store
        .mutate(|repo| {
            repo.update::<ShortcutFolder>(&a, |folder| folder.parent_id = Some("ghost".to_string()))
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { kind: EntityKind::ShortcutFolder, .. }));
    assert_eq!(*store.snapshot(), *before);

    store
        .mutate(|repo| repo.update::<ShortcutFolder>(&b, |folder| folder.parent_id = None))
        .unwrap();
    assert_eq!(store.snapshot().shortcut_folders.get(&b).unwrap().parent_id, None);
}

#[test]
fn appending_folder_under_missing_parent_is_rejected() {
    let mut doc = Document::empty();
    let err = with_repo(&mut doc, |repo| {
        repo.append(NoteFolder::new("Orphan", Some("ghost".to_string())))
            .unwrap_err()
    });
    assert!(matches!(err, RepoError::NotFound { kind: EntityKind::NoteFolder, .. }));
    assert!(doc.note_folders.is_empty());
}
