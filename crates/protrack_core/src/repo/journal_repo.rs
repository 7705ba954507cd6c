//! Daily journal persistence.
//!
//! # Invariants
//! - `task_id` is stored as given; no referential check against `tasks`.
//! - Listings return insertion order; callers reverse for newest-first views.

use super::{require_changed, RepoResult};
use crate::model::journal::DailyLog;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const LOG_SELECT_SQL: &str = "SELECT id, date, task_id, content FROM daily_logs";

/// Query options for listing daily logs.
#[derive(Debug, Clone, Default)]
pub struct DailyLogQuery {
    /// Exact `YYYY-MM-DD` match.
    pub date: Option<String>,
    pub task_id: Option<String>,
}

pub trait DailyLogRepository {
    fn create_log(&self, log: &DailyLog) -> RepoResult<()>;
    fn list_logs(&self, query: &DailyLogQuery) -> RepoResult<Vec<DailyLog>>;
    fn delete_log(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed daily log repository.
pub struct SqliteDailyLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDailyLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DailyLogRepository for SqliteDailyLogRepository<'_> {
    fn create_log(&self, log: &DailyLog) -> RepoResult<()> {
        log.validate()?;
        self.conn.execute(
            "INSERT INTO daily_logs (id, date, task_id, content) VALUES (?1, ?2, ?3, ?4);",
            params![
                log.id.as_str(),
                log.date.as_str(),
                log.task_id.as_str(),
                log.content.as_str()
            ],
        )?;
        Ok(())
    }

    fn list_logs(&self, query: &DailyLogQuery) -> RepoResult<Vec<DailyLog>> {
        let mut sql = format!("{LOG_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(date) = &query.date {
            sql.push_str(" AND date = ?");
            bind_values.push(Value::Text(date.clone()));
        }
        if let Some(task_id) = &query.task_id {
            sql.push_str(" AND task_id = ?");
            bind_values.push(Value::Text(task_id.clone()));
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }
        Ok(logs)
    }

    fn delete_log(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM daily_logs WHERE id = ?1;", [id])?;
        require_changed(changed, id)
    }
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<DailyLog> {
    let log = DailyLog {
        id: row.get("id")?,
        date: row.get("date")?,
        task_id: row.get("task_id")?,
        content: row.get("content")?,
    };
    log.validate()?;
    Ok(log)
}
