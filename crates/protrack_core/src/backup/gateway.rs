//! Backup gateway: directory acquisition and the single-shot snapshot write.

use super::capability::{
    DirectoryHandle, DirectoryPicker, FileWriteCapability, NativeFileWriter, PickOutcome,
};
use super::error::{BackupError, BackupResult, WriteStage};
use super::file_name::backup_file_name;
use crate::model::snapshot::Snapshot;
use chrono::{DateTime, FixedOffset, Local};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Wall-clock source for backup file names.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Metadata about a completed backup write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes_written: usize,
    /// A backup from the same minute was replaced.
    pub overwritten: bool,
}

/// Persistence gateway over host picker, file-write and clock capabilities.
pub struct BackupGateway<P, W = NativeFileWriter, C = SystemClock> {
    picker: P,
    writer: W,
    clock: C,
}

impl<P: DirectoryPicker> BackupGateway<P> {
    /// Gateway writing to the native filesystem with the local clock.
    pub fn native(picker: P) -> Self {
        Self::new(picker, NativeFileWriter, SystemClock)
    }
}

impl<P, W, C> BackupGateway<P, W, C>
where
    P: DirectoryPicker,
    W: FileWriteCapability,
    C: Clock,
{
    pub fn new(picker: P, writer: W, clock: C) -> Self {
        Self {
            picker,
            writer,
            clock,
        }
    }

    /// Asks the user for a backup directory.
    ///
    /// Returns `Ok(None)` when the user cancelled.
    ///
    /// # Errors
    /// - `CapabilityUnavailable` when the host has no picker; the picker is
    ///   not invoked.
    /// - `AccessError` when the picker fails or the picked path is not an
    ///   existing directory.
    pub fn acquire_directory_access(&mut self) -> BackupResult<Option<DirectoryHandle>> {
        if !self.picker.is_available() {
            warn!("event=backup_pick module=backup status=unavailable");
            return Err(BackupError::CapabilityUnavailable);
        }

        let path = match self.picker.pick_directory() {
            Ok(PickOutcome::Selected(path)) => path,
            Ok(PickOutcome::Cancelled) => {
                info!("event=backup_pick module=backup status=cancelled");
                return Ok(None);
            }
            Err(err) => {
                error!(
                    "event=backup_pick module=backup status=error error_code=picker_failed error={}",
                    err.message
                );
                return Err(BackupError::AccessError(err.message));
            }
        };

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                info!("event=backup_pick module=backup status=ok");
                Ok(Some(DirectoryHandle::grant(path)))
            }
            Ok(_) => {
                error!("event=backup_pick module=backup status=error error_code=not_a_directory");
                Err(BackupError::AccessError(format!(
                    "`{}` is not a directory",
                    path.display()
                )))
            }
            Err(err) => {
                error!(
                    "event=backup_pick module=backup status=error error_code=metadata_failed error={err}"
                );
                Err(BackupError::AccessError(format!(
                    "`{}`: {err}",
                    path.display()
                )))
            }
        }
    }

    /// Writes `snapshot` into `dir` and reports success as a boolean.
    ///
    /// Failures are logged with their protocol stage and collapsed to `false`.
    pub fn write_backup(&self, dir: &DirectoryHandle, snapshot: &Snapshot) -> bool {
        self.try_write_backup(dir, snapshot).is_ok()
    }

    /// Writes `snapshot` into `dir` and returns details about the file.
    ///
    /// Protocol: serialize, open-or-create, create stream, single write, close.
    /// An interrupted write can leave a truncated file behind.
    pub fn try_write_backup(
        &self,
        dir: &DirectoryHandle,
        snapshot: &Snapshot,
    ) -> BackupResult<BackupReceipt> {
        let started_at = Instant::now();
        let file_name = backup_file_name(&self.clock.now());

        let result = self.write_file(dir, &file_name, snapshot);
        match &result {
            Ok(receipt) => {
                if receipt.overwritten {
                    warn!(
                        "event=backup_write module=backup status=overwrite file_name={}",
                        receipt.file_name
                    );
                }
                info!(
                    "event=backup_write module=backup status=ok file_name={} bytes={} tasks={} logs={} observations={} duration_ms={}",
                    receipt.file_name,
                    receipt.bytes_written,
                    snapshot.tasks.len(),
                    snapshot.logs.len(),
                    snapshot.observations.len(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                let stage = match err {
                    BackupError::WriteFailure { stage, .. } => stage.as_str(),
                    _ => "unknown",
                };
                error!(
                    "event=backup_write module=backup status=error stage={stage} file_name={file_name} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
            }
        }
        result
    }

    fn write_file(
        &self,
        dir: &DirectoryHandle,
        file_name: &str,
        snapshot: &Snapshot,
    ) -> BackupResult<BackupReceipt> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| BackupError::write_failure(WriteStage::Serialize, err))?;

        let file = self
            .writer
            .get_file_handle(dir, file_name)
            .map_err(|err| BackupError::write_failure(WriteStage::OpenFile, err))?;

        let mut stream = self
            .writer
            .create_writable(&file)
            .map_err(|err| BackupError::write_failure(WriteStage::CreateStream, err))?;

        stream
            .write(&json)
            .map_err(|err| BackupError::write_failure(WriteStage::Write, err))?;

        stream
            .close()
            .map_err(|err| BackupError::write_failure(WriteStage::Close, err))?;

        Ok(BackupReceipt {
            file_name: file_name.to_string(),
            path: file.path,
            bytes_written: json.len(),
            overwritten: file.existed,
        })
    }
}
