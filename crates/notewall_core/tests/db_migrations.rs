use notewall_core::db::migrations::{current_version, latest_version};
use notewall_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "notes");
}

#[test]
fn reopening_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notewall.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO notes (uuid, headline, body, color, position)
             VALUES ('00000000-0000-4000-8000-000000000001', 'kept', '', '#FFFFFF', 1);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_version(&second).unwrap(), latest_version());
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn store_from_newer_build_is_refused_and_named() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    let message = err.to_string();
    match err {
        DbError::UnsupportedSchemaVersion {
            location,
            db_version,
            latest_supported,
        } => {
            assert_eq!(location, path.display().to_string());
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(message.contains("future.db"), "{message}");
    assert!(message.contains("v999"), "{message}");

    // The refused store is left untouched.
    let conn = Connection::open(&path).unwrap();
    assert_eq!(current_version(&conn).unwrap(), 999);
}

#[test]
fn missing_parent_directory_reports_open_error_with_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("notes.db");

    match open_db(&path).unwrap_err() {
        DbError::Open { location, .. } => {
            assert_eq!(location, path.display().to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
