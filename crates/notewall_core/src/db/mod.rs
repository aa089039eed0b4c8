//! Note store bootstrap: connection setup and schema migrations.
//!
//! # Responsibility
//! - Open the SQLite file (or in-memory store) that backs the note wall.
//! - Bring its schema up to the version this build understands.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A store written by a newer build is refused, never downgraded.
//! - Every error raised while opening names the store it was about.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, MEMORY_LOCATION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The store could not be opened at all (missing directory, permissions).
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// The store's schema is ahead of this build.
    UnsupportedSchemaVersion {
        location: String,
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open note store {location}: {source}")
            }
            Self::UnsupportedSchemaVersion {
                location,
                db_version,
                latest_supported,
            } => write!(
                f,
                "note store {location} has schema v{db_version}; this build reads up to v{latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
