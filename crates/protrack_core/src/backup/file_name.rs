//! Backup file naming.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const BACKUP_FILE_PREFIX: &str = "ProTrack_Backup_";
pub const BACKUP_FILE_EXTENSION: &str = ".json";

/// Builds the backup file name for the given wall-clock instant.
///
/// Date and time come from the same zoned instant, so a backup taken just
/// after local midnight is named with the local date. Resolution is one
/// minute: instants in the same minute yield the same name.
pub fn backup_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{BACKUP_FILE_PREFIX}{}{BACKUP_FILE_EXTENSION}",
        at.format("%Y-%m-%d_%H-%M")
    )
}
