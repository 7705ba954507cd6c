//! Task board use-cases.
//!
//! # Invariants
//! - New tasks start as `NOT_STARTED` with a generated id.
//! - Deleting a task leaves its journal entries in place.

use super::{ServiceError, ServiceResult};
use crate::model::new_record_id;
use crate::model::task::{Task, TaskStatus};
use crate::repo::task_repo::{TaskListQuery, TaskOrder, TaskRepository};

/// Input for creating a task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub display_id: String,
    pub description: String,
    pub due_date: String,
    pub priority: u32,
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, input: NewTask) -> ServiceResult<Task> {
        let task = Task {
            id: new_record_id(),
            display_id: input.display_id.trim().to_string(),
            description: input.description.trim().to_string(),
            status: TaskStatus::NotStarted,
            due_date: input.due_date.trim().to_string(),
            priority: input.priority,
        };
        self.repo.create_task(&task)?;
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> ServiceResult<Option<Task>> {
        Ok(self.repo.get_task(id)?)
    }

    pub fn set_status(&self, id: &str, status: TaskStatus) -> ServiceResult<Task> {
        self.modify(id, |task| task.status = status)
    }

    pub fn set_due_date(&self, id: &str, due_date: &str) -> ServiceResult<Task> {
        let due_date = due_date.trim().to_string();
        self.modify(id, move |task| task.due_date = due_date)
    }

    /// Replaces every editable field of an existing task.
    pub fn update_task(&self, task: &Task) -> ServiceResult<()> {
        Ok(self.repo.update_task(task)?)
    }

    pub fn delete_task(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_task(id)?)
    }

    /// Board listing: earliest due date first.
    pub fn board(&self) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            order: TaskOrder::DueDate,
            ..TaskListQuery::default()
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Board listing filtered by a keyword over display id and description.
    ///
    /// A blank keyword returns the whole board.
    pub fn search(&self, keyword: &str) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            text: Some(keyword.to_string()),
            order: TaskOrder::DueDate,
            ..TaskListQuery::default()
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Task selector for the journal: open tasks first, done tasks last.
    pub fn journal_choices(&self) -> ServiceResult<Vec<Task>> {
        let mut tasks = self.board()?;
        tasks.sort_by_key(|task| task.status.is_done());
        Ok(tasks)
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Task)) -> ServiceResult<Task> {
        let mut task = self
            .repo
            .get_task(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        change(&mut task);
        self.repo.update_task(&task)?;
        Ok(task)
    }
}
