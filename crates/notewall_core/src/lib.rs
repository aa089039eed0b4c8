//! Core domain logic for the notewall app.
//! This crate is the single source of truth for layout and note invariants.

pub mod db;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use layout::masonry::{
    column_for_index, compute_layout, LayoutConfig, LayoutError, LayoutResult, MasonryLayout,
    PlacementResult, Rect,
};
pub use layout::measure::{
    FontDescriptor, GlyphGridMeasurer, NoteHeightOracle, TextMeasurer, CARD_CHROME_HEIGHT,
    FALLBACK_ITEM_HEIGHT,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::color::{ColorParseError, NoteColor};
pub use model::note::{Note, NoteId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use search::headline::{filter_by_headline, headline_matches};
pub use service::note_service::{NoteService, NoteServiceError, NoteServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
