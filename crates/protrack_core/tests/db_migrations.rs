use protrack_core::db::migrations::latest_version;
use protrack_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["tasks", "daily_logs", "observations", "off_days", "app_config"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn observations_gain_status_column_with_new_default() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO observations (id, timestamp, content) VALUES ('o1', '2024-03-05T14:32:00Z', 'x');",
        [],
    )
    .unwrap();
    let status: String = conn
        .query_row("SELECT status FROM observations WHERE id = 'o1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(status, "NEW");
}

#[test]
fn tasks_table_holds_only_exported_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('tasks');").unwrap();
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(
        columns,
        ["id", "display_id", "description", "status", "due_date", "priority"]
    );
}

#[test]
fn daily_logs_have_no_foreign_key_to_tasks() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO daily_logs (id, date, task_id, content) VALUES ('l1', '2024-03-05', 'missing', 'x');",
        [],
    )
    .unwrap();
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("protrack.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "tasks");
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
