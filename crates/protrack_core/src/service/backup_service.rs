//! Backup use-cases for hosts.
//!
//! # Responsibility
//! - Turn gateway outcomes into user-facing notices.
//! - Assemble the snapshot from the state store right before each write.
//!
//! # Invariants
//! - Cancelling the picker yields no handle and no notice.
//! - A failed backup leaves the state store and earlier backup files untouched.

use super::store::AppStore;
use crate::backup::{
    BackupError, BackupGateway, Clock, DirectoryHandle, DirectoryPicker, FileWriteCapability,
    NativeFileWriter, SystemClock,
};
use log::error;

pub const UNSUPPORTED_PICKER_NOTICE: &str =
    "This host does not support choosing a backup folder.";
pub const BACKUP_FAILED_NOTICE: &str =
    "Backup failed. Check that the folder is still available and try again.";

/// Result of asking the user for a backup folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSelection {
    pub handle: Option<DirectoryHandle>,
    /// Alert text to show, if any.
    pub notice: Option<String>,
}

/// Result of one backup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub ok: bool,
    pub file_name: Option<String>,
    pub message: String,
}

pub struct BackupService<'conn, P, W = NativeFileWriter, C = SystemClock> {
    store: AppStore<'conn>,
    gateway: BackupGateway<P, W, C>,
}

impl<'conn, P, W, C> BackupService<'conn, P, W, C>
where
    P: DirectoryPicker,
    W: FileWriteCapability,
    C: Clock,
{
    pub fn new(store: AppStore<'conn>, gateway: BackupGateway<P, W, C>) -> Self {
        Self { store, gateway }
    }

    pub fn select_backup_folder(&mut self) -> FolderSelection {
        select_folder(&mut self.gateway)
    }

    /// Snapshots the store and writes it into `dir`.
    pub fn perform_backup(&self, dir: &DirectoryHandle) -> BackupOutcome {
        let snapshot = match self.store.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(
                    "event=backup_snapshot module=backup status=error error_code=snapshot_load_failed error={err}"
                );
                return BackupOutcome::failed();
            }
        };

        match self.gateway.try_write_backup(dir, &snapshot) {
            Ok(receipt) => BackupOutcome {
                ok: true,
                message: format!("Backup saved as {}.", receipt.file_name),
                file_name: Some(receipt.file_name),
            },
            Err(_) => BackupOutcome::failed(),
        }
    }

    /// Picks a folder and backs up into it in one user action.
    ///
    /// Returns `None` when the user cancelled the picker.
    pub fn backup_now(&mut self) -> Option<BackupOutcome> {
        let selection = self.select_backup_folder();
        match (selection.handle, selection.notice) {
            (Some(handle), _) => Some(self.perform_backup(&handle)),
            (None, Some(notice)) => Some(BackupOutcome {
                ok: false,
                file_name: None,
                message: notice,
            }),
            (None, None) => None,
        }
    }
}

/// Asks the gateway for a backup folder and maps the outcome to a notice.
///
/// Touches no application state; hosts may call it before the store opens.
pub fn select_folder<P, W, C>(gateway: &mut BackupGateway<P, W, C>) -> FolderSelection
where
    P: DirectoryPicker,
    W: FileWriteCapability,
    C: Clock,
{
    match gateway.acquire_directory_access() {
        Ok(handle) => FolderSelection {
            handle,
            notice: None,
        },
        Err(BackupError::CapabilityUnavailable) => FolderSelection {
            handle: None,
            notice: Some(UNSUPPORTED_PICKER_NOTICE.to_string()),
        },
        Err(BackupError::AccessError(message)) => FolderSelection {
            handle: None,
            notice: Some(format!("Could not access folder. {message}")),
        },
        Err(other) => FolderSelection {
            handle: None,
            notice: Some(format!("Could not access folder. {other}")),
        },
    }
}

impl BackupOutcome {
    fn failed() -> Self {
        Self {
            ok: false,
            file_name: None,
            message: BACKUP_FAILED_NOTICE.to_string(),
        }
    }
}
