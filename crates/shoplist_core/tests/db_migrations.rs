use shoplist_core::db::migrations::latest_version;
use shoplist_core::db::{open_db, open_db_in_memory, DbError};
use shoplist_core::{ArticleRepository, SqliteArticleRepository, Store};
use rusqlite::Connection;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "articles");
    assert_table_exists(&conn, "lists");
    assert_table_exists(&conn, "positions");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shoplist.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO articles (name) VALUES ('Milk');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM articles;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO positions (list_id, article_name) VALUES (404, 'Milk');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn store_session_lends_a_migrated_connection() {
    let store = Store::open_in_memory().unwrap();
    let session = store.session().unwrap();
    let version = session
        .with_connection(|conn| Ok::<_, DbError>(schema_version(conn)))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn file_store_sessions_use_write_ahead_logging() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("shoplist.db")).unwrap();
    let session = store.session().unwrap();
    let mode: String = session
        .with_connection(|conn| {
            conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))
                .map_err(DbError::from)
        })
        .unwrap();
    assert_eq!(mode, "wal");
}

#[test]
fn held_file_session_does_not_stall_a_concurrent_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("shoplist.db")).unwrap());
    let reader = store.session().unwrap();
    reader
        .with_connection(|conn| {
            conn.execute("INSERT INTO articles (name) VALUES ('Milk');", [])
                .map_err(DbError::from)
        })
        .unwrap();

    let (held_tx, held_rx) = mpsc::channel();
    let writer_store = Arc::clone(&store);
    let writer = thread::spawn(move || {
        let session = writer_store.session().unwrap();
        session
            .with_connection(|conn| {
                conn.execute_batch(
                    "BEGIN IMMEDIATE; INSERT INTO articles (name) VALUES ('Eggs');",
                )?;
                held_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(800));
                conn.execute_batch("COMMIT;")?;
                Ok::<_, DbError>(())
            })
            .unwrap();
    });

    held_rx.recv().unwrap();
    let started_at = Instant::now();
    let names: Vec<String> = reader
        .with_connection(|conn| SqliteArticleRepository::new(conn).list_articles())
        .unwrap()
        .into_iter()
        .map(|article| article.name)
        .collect();
    let waited = started_at.elapsed();

    assert_eq!(names, vec!["Milk".to_string()]);
    assert!(waited < Duration::from_millis(400), "read waited {waited:?}");
    writer.join().unwrap();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
