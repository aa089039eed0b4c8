//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/delete/fetch-all APIs over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - At most one row per note id (`uuid` primary key).
//! - `fetch_all` order is creation order (`position ASC, uuid ASC`) and is
//!   not affected by later edits.
//! - Color is written once on insert; updates never touch it.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::color::NoteColor;
use crate::model::note::{Note, NoteId};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    headline,
    body,
    color
FROM notes";

const NEXT_POSITION_SQL: &str = "(SELECT COALESCE(MAX(position), 0) + 1 FROM notes)";

const REQUIRED_COLUMNS: [&str; 6] = ["uuid", "headline", "body", "color", "position", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    Duplicate(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Duplicate(id) => write!(f, "note already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator for notes: a key-by-id store with stable order.
pub trait NoteRepository {
    /// Inserts a new note and returns its id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Upserts by id: existing rows get headline/body, missing rows are
    /// inserted with the given color.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    /// Hard-deletes one note.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Returns every note in wall order.
    fn fetch_all(&self) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   not migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        let result = self.conn.execute(
            &format!(
                "INSERT INTO notes (uuid, headline, body, color, position)
                 VALUES (?1, ?2, ?3, ?4, {NEXT_POSITION_SQL});"
            ),
            params![
                note.id.to_string(),
                note.headline.as_str(),
                note.body.as_str(),
                note.color.to_hex(),
            ],
        );

        match result {
            Ok(_) => Ok(note.id),
            Err(err) if is_constraint_violation(&err) => Err(RepoError::Duplicate(note.id)),
            Err(err) => Err(err.into()),
        }
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO notes (uuid, headline, body, color, position)
                 VALUES (?1, ?2, ?3, ?4, {NEXT_POSITION_SQL})
                 ON CONFLICT(uuid) DO UPDATE SET
                    headline = excluded.headline,
                    body = excluded.body,
                    updated_at = (strftime('%s', 'now') * 1000);"
            ),
            params![
                note.id.to_string(),
                note.headline.as_str(),
                note.body.as_str(),
                note.color.to_hex(),
            ],
        )?;
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn fetch_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY position ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let color_text: String = row.get("color")?;
    let color = NoteColor::from_hex(&color_text)
        .map_err(|err| RepoError::InvalidData(format!("{err} in notes.color")))?;

    Ok(Note {
        id,
        headline: row.get("headline")?,
        body: row.get("body")?,
        color,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
