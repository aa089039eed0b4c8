//! Note domain model.
//!
//! # Responsibility
//! - Define the content record rendered as one card on the note wall.
//! - Provide lifecycle helpers for draft creation and editor saves.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `id` and `color` are fixed at creation; edits touch text only.

use super::color::NoteColor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Content record behind one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Bold title line; the only field matched by search.
    pub headline: String,
    /// Free text shown under the headline.
    pub body: String,
    pub color: NoteColor,
}

impl Note {
    /// Creates an empty draft with a fresh id and a random pastel color.
    pub fn draft() -> Self {
        Self::with_id(Uuid::new_v4(), NoteColor::random_pastel())
    }

    /// Creates an empty note with a caller-provided identity.
    pub fn with_id(id: NoteId, color: NoteColor) -> Self {
        Self {
            id,
            headline: String::new(),
            body: String::new(),
            color,
        }
    }

    /// Replaces the editable text fields.
    pub fn edit(&mut self, headline: impl Into<String>, body: impl Into<String>) {
        self.headline = headline.into();
        self.body = body.into();
    }

    /// Returns whether both text fields are empty.
    pub fn is_blank(&self) -> bool {
        self.headline.is_empty() && self.body.is_empty()
    }
}
