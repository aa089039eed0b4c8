//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract consumed by the note service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod note_repo;
