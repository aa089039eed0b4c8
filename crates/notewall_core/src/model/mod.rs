//! Domain model for the note wall.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; no tombstones are kept.

pub mod color;
pub mod note;
