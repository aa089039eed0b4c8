//! Note wall use-case service.
//!
//! # Responsibility
//! - Provide the list-controller use-cases: new draft, save, delete, list,
//!   headline search.
//! - Read back persisted state after writes so callers render what storage
//!   holds.
//!
//! # Invariants
//! - Saving never changes a note's id or color.
//! - Drafts are not persisted until their first save.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::search::headline::filter_by_headline;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns an unsaved empty note with a fresh id and pastel color.
    pub fn new_note_draft(&self) -> Note {
        Note::draft()
    }

    /// Persists a draft or an edited note and returns the stored state.
    ///
    /// Existing notes only take `headline`/`body` from the argument.
    pub fn save_note(&self, note: &Note) -> NoteServiceResult<Note> {
        self.repo.update_note(note)?;
        info!(
            "event=note_save module=service status=ok note_id={} headline_chars={} body_chars={}",
            note.id,
            note.headline.chars().count(),
            note.body.chars().count()
        );
        self.repo
            .get_note(note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "saved note not found in read-back",
            ))
    }

    /// Applies editor text to a stored note.
    pub fn edit_note(
        &self,
        id: NoteId,
        headline: impl Into<String>,
        body: impl Into<String>,
    ) -> NoteServiceResult<Note> {
        let mut note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        note.edit(headline, body);
        self.save_note(&note)
    }

    /// Deletes one note by id.
    pub fn delete_note(&self, id: NoteId) -> NoteServiceResult<()> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> NoteServiceResult<Option<Note>> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists all notes in wall order.
    pub fn list_notes(&self) -> NoteServiceResult<Vec<Note>> {
        Ok(self.repo.fetch_all()?)
    }

    /// Lists notes whose headline contains `query` (case-insensitive).
    pub fn search_notes(&self, query: &str) -> NoteServiceResult<Vec<Note>> {
        let notes = self.repo.fetch_all()?;
        Ok(filter_by_headline(&notes, query))
    }
}
