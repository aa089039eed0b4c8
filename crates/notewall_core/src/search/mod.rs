//! Note search entry points.
//!
//! # Responsibility
//! - Filter the note wall by headline text.

pub mod headline;
