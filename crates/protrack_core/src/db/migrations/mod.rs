//! SQLite migration registry and executor.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - All pending migrations commit in one transaction or not at all.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_observation_status.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    latest_in(MIGRATIONS)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_from(conn, MIGRATIONS)
}

fn latest_in(migrations: &[Migration]) -> u32 {
    migrations.last().map_or(0, |migration| migration.version)
}

fn apply_from(conn: &mut Connection, migrations: &[Migration]) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_in(migrations);

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    if from == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in migrations.iter().filter(|m| m.version > from) {
        tx.execute_batch(migration.sql).inspect_err(|err| {
            error!(
                "event=db_migrate module=db status=error version={} error={err}",
                migration.version
            );
        })?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_from, current_user_version, Migration};
    use rusqlite::Connection;

    const BROKEN: &[Migration] = &[
        Migration {
            version: 1,
            sql: "CREATE TABLE first_step (id TEXT PRIMARY KEY NOT NULL);",
        },
        Migration {
            version: 2,
            sql: "CREATE TABLE second_step (id TEXT PRIMARY KEY NOT NULL",
        },
    ];

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .expect("query sqlite_master")
            == 1
    }

    #[test]
    fn failing_migration_rolls_back_every_pending_step() {
        let mut conn = Connection::open_in_memory().expect("open");

        assert!(apply_from(&mut conn, BROKEN).is_err());

        assert_eq!(current_user_version(&conn).expect("version"), 0);
        assert!(!table_exists(&conn, "first_step"));
    }

    #[test]
    fn pending_steps_apply_from_current_version() {
        let mut conn = Connection::open_in_memory().expect("open");
        apply_from(&mut conn, &BROKEN[..1]).expect("first step");
        assert_eq!(current_user_version(&conn).expect("version"), 1);

        let fixed = [
            BROKEN[0],
            Migration {
                version: 2,
                sql: "CREATE TABLE second_step (id TEXT PRIMARY KEY NOT NULL);",
            },
        ];
        apply_from(&mut conn, &fixed).expect("second step");

        assert_eq!(current_user_version(&conn).expect("version"), 2);
        assert!(table_exists(&conn, "first_step"));
        assert!(table_exists(&conn, "second_step"));
    }
}
