//! Headline substring search.
//!
//! # Invariants
//! - Matching is case-insensitive and only looks at `headline`.
//! - A blank query matches every note.
//! - Filtering preserves input order.

use crate::model::note::Note;

/// Returns whether `headline` contains `query`, ignoring case.
pub fn headline_matches(headline: &str, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    headline.to_lowercase().contains(&needle.to_lowercase())
}

/// Keeps the notes whose headline matches `query`.
pub fn filter_by_headline(notes: &[Note], query: &str) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| headline_matches(note.headline.as_str(), query))
        .cloned()
        .collect()
}
