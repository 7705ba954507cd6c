//! Backup error taxonomy.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BackupResult<T> = Result<T, BackupError>;

/// Step of the write protocol that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Serialize,
    OpenFile,
    CreateStream,
    Write,
    Close,
}

impl WriteStage {
    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::OpenFile => "open_file",
            Self::CreateStream => "create_stream",
            Self::Write => "write",
            Self::Close => "close",
        }
    }
}

/// Backup gateway error.
///
/// Picker cancellation is not an error; it surfaces as `Ok(None)` from
/// `BackupGateway::acquire_directory_access`.
#[derive(Debug)]
pub enum BackupError {
    /// The host exposes no directory picker.
    CapabilityUnavailable,
    /// The picker failed for a reason other than cancellation, or the picked
    /// path is not a usable directory.
    AccessError(String),
    WriteFailure {
        stage: WriteStage,
        source: Box<dyn Error + Send + Sync>,
    },
}

impl BackupError {
    pub(crate) fn write_failure(
        stage: WriteStage,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::WriteFailure {
            stage,
            source: source.into(),
        }
    }

    /// Stable machine-readable code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CapabilityUnavailable => "capability_unavailable",
            Self::AccessError(_) => "access_error",
            Self::WriteFailure { .. } => "write_failure",
        }
    }
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapabilityUnavailable => {
                write!(f, "directory selection is not supported by this host")
            }
            Self::AccessError(message) => write!(f, "could not access folder: {message}"),
            Self::WriteFailure { stage, source } => {
                write!(f, "backup write failed at {}: {source}", stage.as_str())
            }
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailure { source, .. } => Some(source.as_ref()),
            Self::CapabilityUnavailable | Self::AccessError(_) => None,
        }
    }
}
