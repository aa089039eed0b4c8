//! CLI entry point.
//!
//! # Responsibility
//! - Verify `notewall_core` linkage with a deterministic smoke probe.
//! - Inspect a note database and preview its masonry wall without a UI host.

use anyhow::{anyhow, Context as _};
use clap::{Parser, Subcommand};
use notewall_core::db::open_db;
use notewall_core::{
    default_log_level, init_logging, GlyphGridMeasurer, LayoutConfig, MasonryLayout, Note,
    NoteHeightOracle, NoteService, SqliteNoteRepository,
};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "notewall.sqlite3";
const DB_PATH_ENV: &str = "NOTEWALL_DB_PATH";

#[derive(Parser, Debug)]
#[command(name = "notewall", version)]
struct Cli {
    /// Database file (defaults to $NOTEWALL_DB_PATH, then the temp dir).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// List notes in wall order, optionally filtered by headline.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a note with the given text.
    New {
        #[arg(long, default_value = "")]
        headline: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Print masonry frames for the stored notes.
    Layout {
        /// Container width in points.
        #[arg(long, default_value_t = 390.0)]
        width: f64,

        #[arg(long, default_value_t = 2)]
        columns: usize,

        #[arg(long, default_value_t = 8.0)]
        padding: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| anyhow!("log dir must be valid UTF-8"))?;
        init_logging(default_log_level(), log_dir).map_err(|err| anyhow!(err))?;
    }

    match cli.cmd {
        Command::Ping => {
            println!("notewall_core ping={}", notewall_core::ping());
            println!("notewall_core version={}", notewall_core::core_version());
        }
        Command::List { search } => {
            let notes = with_service(cli.db, |service| {
                Ok(match search.as_deref() {
                    Some(query) => service.search_notes(query)?,
                    None => service.list_notes()?,
                })
            })?;
            for note in &notes {
                print_note(note);
            }
        }
        Command::New { headline, body } => {
            let note = with_service(cli.db, |service| {
                let mut draft = service.new_note_draft();
                draft.edit(headline, body);
                Ok(service.save_note(&draft)?)
            })?;
            print_note(&note);
        }
        Command::Layout {
            width,
            columns,
            padding,
        } => {
            let notes = with_service(cli.db, |service| Ok(service.list_notes()?))?;
            let mut layout = MasonryLayout::new(LayoutConfig {
                column_count: columns,
                padding,
            })?;
            let oracle = NoteHeightOracle::new(&notes, GlyphGridMeasurer);
            layout.relayout(notes.len(), width, |index, content_width| {
                oracle.height(index, content_width)
            })?;

            for (index, note) in notes.iter().enumerate() {
                let frame = layout.frame_for_item(index)?;
                println!(
                    "{index}\t{}\tx={:.1} y={:.1} w={:.1} h={:.1}",
                    note.id, frame.x, frame.y, frame.width, frame.height
                );
            }
            let (content_width, content_height) = layout.content_size();
            println!("content {content_width:.1}x{content_height:.1}");
        }
    }

    Ok(())
}

fn print_note(note: &Note) {
    println!("{}\t{}\t{}", note.id, note.color, note.headline);
}

fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var(DB_PATH_ENV)
                .ok()
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn with_service<T>(
    db: Option<PathBuf>,
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let path = resolve_db_path(db);
    let conn = open_db(&path).with_context(|| format!("open database {}", path.display()))?;
    let repo = SqliteNoteRepository::try_new(&conn).context("initialize note repository")?;
    f(&NoteService::new(repo))
}
