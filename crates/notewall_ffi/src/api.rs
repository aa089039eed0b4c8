//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note wall use-cases (list/search/create/save/delete) and the
//!   masonry layout to Dart via FRB.
//! - Flatten core errors into response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids and colors cross the boundary as strings (`uuid`, `#RRGGBB`).

use log::warn;
use notewall_core::db::open_db;
use notewall_core::{
    compute_layout, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, Note, NoteId, NoteService, NoteServiceResult, SqliteNoteRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "notewall.sqlite3";
const DB_PATH_ENV: &str = "NOTEWALL_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One note card as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub headline: String,
    pub body: String,
    /// `#RRGGBB`.
    pub color: String,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            headline: note.headline,
            body: note.body,
            color: note.color.to_hex(),
        }
    }
}

/// List envelope for wall and search calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    /// Notes in wall order.
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Envelope for single-note mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Stored note after the action; `None` on failure and for deletes.
    pub note: Option<NoteItem>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: Option<Note>) -> Self {
        Self {
            ok: true,
            note: note.map(NoteItem::from),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note: None,
            message: message.into(),
        }
    }
}

/// One placed card, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Masonry layout envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResponse {
    pub ok: bool,
    /// One frame per input height; empty on failure.
    pub frames: Vec<LayoutFrame>,
    pub total_content_height: f64,
    pub message: String,
}

/// Lists every note in wall order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesResponse {
    notes_response("notes_list", |service| service.list_notes())
}

/// Lists notes whose headline contains `query` (case-insensitive).
///
/// A blank query returns the full wall.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(query: String) -> NotesResponse {
    notes_response("notes_search", |service| {
        service.search_notes(query.as_str())
    })
}

/// Persists a fresh empty note with a random pastel color.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create() -> NoteActionResponse {
    match with_note_service(|service| service.save_note(&service.new_note_draft())) {
        Ok(note) => NoteActionResponse::success("Note created.", Some(note)),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Saves editor text for one note; inserts it when the id is unknown.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(id: String, headline: String, body: String) -> NoteActionResponse {
    let note_id = match parse_note_id(id.as_str()) {
        Ok(note_id) => note_id,
        Err(message) => return NoteActionResponse::failure(message),
    };

    let result = with_note_service(|service| match service.get_note(note_id)? {
        Some(_) => service.edit_note(note_id, headline, body),
        None => {
            let mut draft = service.new_note_draft();
            draft.id = note_id;
            draft.edit(headline, body);
            service.save_note(&draft)
        }
    });
    match result {
        Ok(note) => NoteActionResponse::success("Note saved.", Some(note)),
        Err(err) => NoteActionResponse::failure(format!("note_save failed: {err}")),
    }
}

/// Deletes one note by id.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> NoteActionResponse {
    let note_id = match parse_note_id(id.as_str()) {
        Ok(note_id) => note_id,
        Err(message) => return NoteActionResponse::failure(message),
    };

    match with_note_service(|service| service.delete_note(note_id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", None),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Computes masonry frames for host-measured card heights.
///
/// `heights[i]` is the card height the host measured for item `i` at the
/// column content width (`container_width / column_count - 2 * padding`).
#[flutter_rust_bridge::frb(sync)]
pub fn masonry_layout(
    container_width: f64,
    column_count: u32,
    padding: f64,
    heights: Vec<f64>,
) -> LayoutResponse {
    match compute_layout(
        heights.len(),
        container_width,
        column_count as usize,
        padding,
        |index, _| heights[index],
    ) {
        Ok(placement) => LayoutResponse {
            ok: true,
            frames: placement
                .frames
                .iter()
                .map(|rect| LayoutFrame {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                })
                .collect(),
            total_content_height: placement.total_content_height,
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_layout module=ffi status=error error={err}");
            LayoutResponse {
                ok: false,
                frames: Vec::new(),
                total_content_height: 0.0,
                message: format!("masonry_layout failed: {err}"),
            }
        }
    }
}

fn notes_response(
    operation: &str,
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> NoteServiceResult<Vec<Note>>,
) -> NotesResponse {
    match with_note_service(f) {
        Ok(notes) => NotesResponse {
            ok: true,
            message: format!("{} note(s).", notes.len()),
            items: notes.into_iter().map(NoteItem::from).collect(),
        },
        Err(err) => NotesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn parse_note_id(raw: &str) -> Result<NoteId, String> {
    NoteId::parse_str(raw.trim()).map_err(|_| format!("invalid note id `{raw}`"))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_note_service<T>(
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> NoteServiceResult<T>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let repo = SqliteNoteRepository::try_new(&conn)
        .map_err(|err| format!("note repo init failed: {err}"))?;
    let service = NoteService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, masonry_layout, note_create, note_delete, note_save,
        notes_list, notes_search, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn note_create_returns_blank_pastel_note() {
        let response = note_create();
        assert!(response.ok, "{}", response.message);
        let note = response.note.expect("created note should be returned");
        assert!(note.headline.is_empty());
        assert!(note.body.is_empty());
        assert!(note.color.starts_with('#') && note.color.len() == 7);
    }

    #[test]
    fn saved_note_is_listed_and_searchable() {
        let token = unique_token("ffi-search");
        let created = note_create().note.expect("create should succeed");

        let saved = note_save(created.id.clone(), token.to_uppercase(), "body".to_string());
        assert!(saved.ok, "{}", saved.message);
        let saved_note = saved.note.expect("saved note should be returned");
        assert_eq!(saved_note.color, created.color);

        let listed = notes_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == created.id));

        let found = notes_search(token);
        assert!(found.ok, "{}", found.message);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, created.id);
    }

    #[test]
    fn note_delete_removes_note_and_rejects_repeat() {
        let created = note_create().note.expect("create should succeed");

        let deleted = note_delete(created.id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!notes_list().items.iter().any(|item| item.id == created.id));

        let again = note_delete(created.id);
        assert!(!again.ok);
        assert!(again.message.contains("not found"));
    }

    #[test]
    fn invalid_note_id_is_reported() {
        let response = note_save("nope".to_string(), String::new(), String::new());
        assert!(!response.ok);
        assert!(response.message.contains("invalid note id"));
    }

    #[test]
    fn note_save_persists_row_with_hex_color() {
        let created = note_create().note.expect("create should succeed");
        note_save(created.id.clone(), "row".to_string(), "check".to_string());

        let conn = notewall_core::db::open_db(super::resolve_db_path()).expect("open db");
        let (headline, color): (String, String) = conn
            .query_row(
                "SELECT headline, color FROM notes WHERE uuid = ?1",
                [created.id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("query note row");
        assert_eq!(headline, "row");
        assert_eq!(color, created.color);
    }

    #[test]
    fn masonry_layout_places_cards_round_robin() {
        let response = masonry_layout(300.0, 2, 10.0, vec![100.0, 100.0, 100.0]);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.frames.len(), 3);
        assert_eq!(response.frames[1].x, 160.0);
        assert_eq!(response.frames[2].y, 110.0);
        assert_eq!(response.total_content_height, 200.0);
    }

    #[test]
    fn masonry_layout_accepts_more_columns_than_cards() {
        let response = masonry_layout(300.0, u32::MAX, 0.0, vec![40.0, 60.0]);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.frames.len(), 2);
        assert_eq!(response.frames[1].y, 0.0);
        assert_eq!(response.total_content_height, 60.0);
    }

    #[test]
    fn masonry_layout_reports_invalid_height_without_frames() {
        let response = masonry_layout(300.0, 2, 10.0, vec![100.0, -1.0]);
        assert!(!response.ok);
        assert!(response.frames.is_empty());
        assert!(response.message.contains("item 1"));
    }

    #[test]
    fn masonry_layout_rejects_zero_columns() {
        let response = masonry_layout(300.0, 0, 10.0, vec![100.0]);
        assert!(!response.ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
