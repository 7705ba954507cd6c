//! Explicit application state holder.
//!
//! # Responsibility
//! - Hand out use-case services bound to one state store connection.
//! - Assemble the full `Snapshot` read by backups and the weekly digest.
//!
//! # Invariants
//! - Snapshot collections keep insertion order; off-days are sorted.
//! - Loading a snapshot never mutates the store.

use super::journal_service::JournalService;
use super::observation_service::ObservationService;
use super::settings_service::SettingsService;
use super::task_service::TaskService;
use crate::model::snapshot::Snapshot;
use crate::repo::journal_repo::{DailyLogQuery, DailyLogRepository, SqliteDailyLogRepository};
use crate::repo::observation_repo::{ObservationRepository, SqliteObservationRepository};
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use crate::repo::RepoResult;
use log::debug;
use rusqlite::Connection;

/// Borrowed view of the SQLite state store.
#[derive(Clone, Copy)]
pub struct AppStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> AppStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn tasks(&self) -> TaskService<SqliteTaskRepository<'conn>> {
        TaskService::new(SqliteTaskRepository::new(self.conn))
    }

    pub fn journal(&self) -> JournalService<SqliteDailyLogRepository<'conn>> {
        JournalService::new(SqliteDailyLogRepository::new(self.conn))
    }

    pub fn observations(&self) -> ObservationService<SqliteObservationRepository<'conn>> {
        ObservationService::new(SqliteObservationRepository::new(self.conn))
    }

    pub fn settings(&self) -> SettingsService<SqliteSettingsRepository<'conn>> {
        SettingsService::new(SqliteSettingsRepository::new(self.conn))
    }

    /// Reads every table into one snapshot.
    pub fn snapshot(&self) -> RepoResult<Snapshot> {
        let settings = SqliteSettingsRepository::new(self.conn);
        let snapshot = Snapshot {
            tasks: SqliteTaskRepository::new(self.conn).list_tasks(&TaskListQuery::default())?,
            logs: SqliteDailyLogRepository::new(self.conn).list_logs(&DailyLogQuery::default())?,
            observations: SqliteObservationRepository::new(self.conn).list_observations()?,
            off_days: settings.list_off_days()?,
            app_config: settings.load_app_config()?,
        };
        debug!(
            "event=snapshot_load module=store status=ok tasks={} logs={} observations={} off_days={}",
            snapshot.tasks.len(),
            snapshot.logs.len(),
            snapshot.observations.len(),
            snapshot.off_days.len()
        );
        Ok(snapshot)
    }
}
