use rusqlite::Connection;
use todo_core::store::{open_db, open_db_in_memory, SCHEMA_VERSION};
use todo_core::{LocalTask, RepoError, SqliteTaskStore, TaskStore};

#[test]
fn open_db_in_memory_installs_tasks_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "tasks");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let store = SqliteTaskStore::new(open_db(&path).unwrap());
    store
        .upsert_task(&LocalTask {
            id: "PISA".to_string(),
            title: "Build tower in Pisa".to_string(),
            description: "Ground looks good".to_string(),
            is_completed: true,
        })
        .unwrap();
    drop(store);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    let reopened = SqliteTaskStore::new(conn);
    let row = reopened.get_task("PISA").unwrap().unwrap();
    assert!(row.is_completed);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        RepoError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn completion_flag_column_rejects_non_boolean_values() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO tasks (id, title, description, is_completed) VALUES ('x', 't', 'd', 2);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {name} does not exist");
}
