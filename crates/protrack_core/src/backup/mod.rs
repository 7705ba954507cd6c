//! Local-file backup of the full application snapshot.
//!
//! # Responsibility
//! - Obtain a user-granted backup directory through a host picker.
//! - Write the snapshot as one pretty-printed JSON file per call.
//!
//! # Invariants
//! - File names are `ProTrack_Backup_<YYYY-MM-DD>_<HH-MM>.json`; two backups
//!   within the same wall-clock minute target the same file and the later one
//!   overwrites the earlier one.
//! - The artifact holds exactly the five snapshot keys; no envelope, version
//!   or checksum.
//! - No retries, no atomic rename; the directory handle is never cached.

mod capability;
mod error;
mod file_name;
mod gateway;

pub use capability::{
    detect_directory_picker, DirectoryHandle, DirectoryPicker, FileHandle, FileWriteCapability,
    HostSelectionPicker, NativeFileWriter, PickOutcome, PickerError, PromptDirectoryPicker,
    WritableStream,
};
pub use error::{BackupError, BackupResult, WriteStage};
pub use file_name::{backup_file_name, BACKUP_FILE_EXTENSION, BACKUP_FILE_PREFIX};
pub use gateway::{BackupGateway, BackupReceipt, Clock, FixedClock, SystemClock};
