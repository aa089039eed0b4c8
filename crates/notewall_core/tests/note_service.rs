use notewall_core::db::open_db_in_memory;
use notewall_core::{NoteService, NoteServiceError, SqliteNoteRepository};
use uuid::Uuid;

#[test]
fn draft_is_blank_pastel_and_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let draft = service.new_note_draft();
    assert!(draft.is_blank());
    assert!(draft.color.is_pastel());
    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn save_inserts_draft_then_updates_text_only() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let mut draft = service.new_note_draft();
    draft.edit("Plan", "first");
    let saved = service.save_note(&draft).unwrap();
    assert_eq!(saved, draft);

    let edited = service.edit_note(saved.id, "Plan v2", "second").unwrap();
    assert_eq!(edited.id, saved.id);
    assert_eq!(edited.color, saved.color);
    assert_eq!(edited.headline, "Plan v2");
    assert_eq!(edited.body, "second");
    assert_eq!(service.list_notes().unwrap(), vec![edited]);
}

#[test]
fn edit_and_delete_missing_note_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    let edit_err = service.edit_note(missing, "x", "y").unwrap_err();
    assert!(matches!(edit_err, NoteServiceError::NoteNotFound(id) if id == missing));

    let delete_err = service.delete_note(missing).unwrap_err();
    assert!(matches!(delete_err, NoteServiceError::NoteNotFound(id) if id == missing));
}

#[test]
fn search_filters_by_headline_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    for (headline, body) in [
        ("Weekend Trip", "pack"),
        ("Groceries", "trip snacks"),
        ("trip budget", ""),
    ] {
        let mut draft = service.new_note_draft();
        draft.edit(headline, body);
        service.save_note(&draft).unwrap();
    }

    let hits = service.search_notes("TRIP").unwrap();
    let headlines = hits
        .iter()
        .map(|note| note.headline.as_str())
        .collect::<Vec<_>>();
    assert_eq!(headlines, vec!["Weekend Trip", "trip budget"]);

    assert_eq!(service.search_notes("  ").unwrap().len(), 3);
}

#[test]
fn delete_removes_note_from_list() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let kept = service.save_note(&service.new_note_draft()).unwrap();
    let removed = service.save_note(&service.new_note_draft()).unwrap();

    service.delete_note(removed.id).unwrap();
    assert_eq!(service.list_notes().unwrap(), vec![kept]);
}
