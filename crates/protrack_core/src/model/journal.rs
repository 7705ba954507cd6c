//! Daily journal entry linked to a task.
//!
//! # Invariants
//! - `task_id` should name an existing task, but this is not enforced: a log
//!   may outlive the task it references.

use super::validation::{require_text, validate_date, ModelValidationError};
use serde::{Deserialize, Serialize};

/// One progress note written against a task on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    pub date: String,
    pub task_id: String,
    pub content: String,
}

impl DailyLog {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("id", &self.id)?;
        validate_date("date", &self.date)?;
        require_text("taskId", &self.task_id)?;
        require_text("content", &self.content)?;
        Ok(())
    }
}
