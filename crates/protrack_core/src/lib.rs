//! Core domain logic for ProTrack.
//! This crate is the single source of truth for application state and backups.

pub mod backup;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use backup::{
    BackupError, BackupGateway, BackupReceipt, BackupResult, DirectoryHandle, DirectoryPicker,
    HostSelectionPicker, NativeFileWriter,
};
pub use config::CorePaths;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::config::AppConfig;
pub use model::journal::DailyLog;
pub use model::observation::{Observation, ObservationStatus};
pub use model::snapshot::Snapshot;
pub use model::task::{Task, TaskStatus};
pub use model::ModelValidationError;
pub use report::{ReportPeriod, WeeklyDigest};
pub use repo::{RepoError, RepoResult};
pub use service::backup_service::{select_folder, BackupOutcome, BackupService, FolderSelection};
pub use service::store::AppStore;
pub use service::task_service::NewTask;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
