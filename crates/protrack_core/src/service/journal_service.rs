//! Daily journal use-cases.

use super::ServiceResult;
use crate::model::journal::DailyLog;
use crate::model::new_record_id;
use crate::repo::journal_repo::{DailyLogQuery, DailyLogRepository};

pub struct JournalService<R: DailyLogRepository> {
    repo: R,
}

impl<R: DailyLogRepository> JournalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records progress against a task on `date`.
    ///
    /// # Contract
    /// - `content` is trimmed; blank content is rejected.
    /// - `task_id` must be non-empty but need not name an existing task.
    pub fn add_log(&self, date: &str, task_id: &str, content: &str) -> ServiceResult<DailyLog> {
        let log = DailyLog {
            id: new_record_id(),
            date: date.trim().to_string(),
            task_id: task_id.trim().to_string(),
            content: content.trim().to_string(),
        };
        self.repo.create_log(&log)?;
        Ok(log)
    }

    /// Timeline for one day, newest entry first.
    pub fn logs_for_date(&self, date: &str) -> ServiceResult<Vec<DailyLog>> {
        let query = DailyLogQuery {
            date: Some(date.trim().to_string()),
            ..DailyLogQuery::default()
        };
        let mut logs = self.repo.list_logs(&query)?;
        logs.reverse();
        Ok(logs)
    }

    pub fn logs_for_task(&self, task_id: &str) -> ServiceResult<Vec<DailyLog>> {
        let query = DailyLogQuery {
            task_id: Some(task_id.to_string()),
            ..DailyLogQuery::default()
        };
        Ok(self.repo.list_logs(&query)?)
    }

    pub fn delete_log(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_log(id)?)
    }
}
