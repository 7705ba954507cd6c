//! Task board record.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `display_id` is the short human label shown on the board (`CW01`).
//! - `due_date` is a canonical `YYYY-MM-DD` date.

use super::validation::{require_text, validate_date, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created but not started.
    NotStarted,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Parses the storage/wire string, accepting lowercase CLI input too.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NOT_STARTED" => Some(Self::NotStarted),
            "IN_PROGRESS" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One card on the task board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub display_id: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
    /// Lower value means more urgent.
    pub priority: u32,
}

impl Task {
    /// Validates identifiers and the due date.
    ///
    /// `description` may be empty; the board renders it as a blank card.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("id", &self.id)?;
        require_text("displayId", &self.display_id)?;
        validate_date("dueDate", &self.due_date)?;
        Ok(())
    }
}
