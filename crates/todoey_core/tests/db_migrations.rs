use rusqlite::Connection;
use todoey_core::db::migrations::{current_user_version, latest_version};
use todoey_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "categories");
    assert_table_exists(&conn, "items");
}

#[test]
fn init_migration_creates_listing_indexes() {
    let conn = open_db_in_memory().unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name;")
        .unwrap();
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        names,
        vec!["idx_categories_created_at", "idx_items_category_title"]
    );
}

#[test]
fn store_and_service_open_on_fresh_database() {
    let service =
        todoey_core::ListService::new(todoey_core::Store::open_in_memory().unwrap()).unwrap();
    assert!(service.load_categories().unwrap().is_empty());

    let dir = tempfile::tempdir().unwrap();
    let store = todoey_core::Store::open(dir.path().join("fresh.db")).unwrap();
    assert_eq!(store.category_count().unwrap(), 0);
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO items (uuid, category_uuid, title, done, date_created, position)
             VALUES ('i', 'missing', 't', 0, 0, 0);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().to_lowercase().contains("foreign key"));
}

#[test]
fn reopening_same_file_keeps_schema_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO categories (uuid, name, colour, created_at)
         VALUES ('00000000-0000-4000-8000-000000000001', 'Work', '#FFB9B3', 1);",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(current_user_version(&reopened).unwrap(), latest_version());
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
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

    match open_db(&path).unwrap_err() {
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
fn opening_a_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(open_db(dir.path()).is_err());
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
