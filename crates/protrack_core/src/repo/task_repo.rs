//! Task board persistence.
//!
//! # Invariants
//! - `create_task` / `update_task` call `Task::validate()` first.
//! - Deleting a task never touches `daily_logs`.

use super::{require_changed, RepoError, RepoResult};
use crate::model::task::{Task, TaskStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    display_id,
    description,
    status,
    due_date,
    priority
FROM tasks";

/// Ordering for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskOrder {
    /// Insertion order; used for snapshots.
    #[default]
    Created,
    /// Board order: earliest due date first, then display id.
    DueDate,
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring over display id and description.
    /// Blank text matches every task.
    pub text: Option<String>,
    pub order: TaskOrder,
}

/// Repository interface for task CRUD.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<()>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: &str) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (id, display_id, description, status, due_date, priority)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.as_str(),
                task.display_id.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.due_date.as_str(),
                i64::from(task.priority),
            ],
        )?;
        Ok(())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                display_id = ?1,
                description = ?2,
                status = ?3,
                due_date = ?4,
                priority = ?5
             WHERE id = ?6;",
            params![
                task.display_id.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.due_date.as_str(),
                i64::from(task.priority),
                task.id.as_str(),
            ],
        )?;
        require_changed(changed, &task.id)
    }

    fn get_task(&self, id: &str) -> RepoResult<Option<Task>> {
        let row = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?;
        row.transpose()
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            sql.push_str(
                " AND (lower(display_id) LIKE ? ESCAPE '\\' OR lower(description) LIKE ? ESCAPE '\\')",
            );
            let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        match query.order {
            TaskOrder::Created => sql.push_str(" ORDER BY rowid ASC"),
            TaskOrder::DueDate => sql.push_str(" ORDER BY due_date ASC, display_id ASC, id ASC"),
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        require_changed(changed, id)
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let priority_raw: i64 = row.get("priority")?;
    let priority = u32::try_from(priority_raw).map_err(|_| {
        RepoError::InvalidData(format!("invalid priority `{priority_raw}` in tasks.priority"))
    })?;

    let task = Task {
        id: row.get("id")?,
        display_id: row.get("display_id")?,
        description: row.get("description")?,
        status,
        due_date: row.get("due_date")?,
        priority,
    };
    task.validate()?;
    Ok(task)
}
