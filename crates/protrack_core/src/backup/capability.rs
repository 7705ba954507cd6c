//! Host capabilities used by the backup gateway.
//!
//! # Responsibility
//! - Abstract the directory picker so hosts without one can be detected.
//! - Abstract file creation and single-shot stream writes.
//!
//! # Invariants
//! - `DirectoryPicker::pick_directory` is only called after
//!   `is_available()` returned `true`.
//! - A `DirectoryHandle` is only minted by the gateway after the picked path
//!   was confirmed to be an existing directory.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Result of an interactive directory pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(PathBuf),
    /// The user dismissed the picker.
    Cancelled,
}

/// Picker failure other than cancellation (permission denied, broken prompt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerError {
    pub message: String,
}

impl PickerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Host-provided interactive directory selection.
pub trait DirectoryPicker {
    /// Feature detection; `false` means the host has no picker at all.
    fn is_available(&self) -> bool;
    fn pick_directory(&mut self) -> Result<PickOutcome, PickerError>;
}

impl<T: DirectoryPicker + ?Sized> DirectoryPicker for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn pick_directory(&mut self) -> Result<PickOutcome, PickerError> {
        (**self).pick_directory()
    }
}

/// Picker for hosts that run their own folder dialog (UI shells, CLI flags).
///
/// The host hands over the outcome it already obtained, or declares that it
/// has no folder dialog at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSelectionPicker {
    supported: bool,
    outcome: Result<PickOutcome, PickerError>,
}

impl HostSelectionPicker {
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            outcome: Ok(PickOutcome::Cancelled),
        }
    }

    pub fn selected(path: impl Into<PathBuf>) -> Self {
        Self {
            supported: true,
            outcome: Ok(PickOutcome::Selected(path.into())),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            supported: true,
            outcome: Ok(PickOutcome::Cancelled),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            supported: true,
            outcome: Err(PickerError::new(message)),
        }
    }
}

impl DirectoryPicker for HostSelectionPicker {
    fn is_available(&self) -> bool {
        self.supported
    }

    fn pick_directory(&mut self) -> Result<PickOutcome, PickerError> {
        self.outcome.clone()
    }
}

/// Line-oriented picker for interactive terminals.
///
/// An empty answer or end of input cancels.
pub struct PromptDirectoryPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDirectoryPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptDirectoryPicker<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> DirectoryPicker for PromptDirectoryPicker<R, W> {
    fn is_available(&self) -> bool {
        true
    }

    fn pick_directory(&mut self) -> Result<PickOutcome, PickerError> {
        write!(self.output, "Backup folder (leave empty to cancel): ")
            .and_then(|()| self.output.flush())
            .map_err(|err| PickerError::new(format!("prompt failed: {err}")))?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|err| PickerError::new(format!("prompt failed: {err}")))?;

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(PickOutcome::Cancelled);
        }
        Ok(PickOutcome::Selected(PathBuf::from(answer)))
    }
}

/// Selects a picker from the running environment.
///
/// - A preset directory (CLI flag, host dialog result) wins.
/// - Otherwise an interactive terminal gets a prompt picker.
/// - Otherwise no picker is available.
pub fn detect_directory_picker(preset: Option<PathBuf>) -> Box<dyn DirectoryPicker> {
    if let Some(path) = preset {
        return Box::new(HostSelectionPicker::selected(path));
    }
    if io::stdin().is_terminal() {
        return Box::new(PromptDirectoryPicker::stdio());
    }
    Box::new(HostSelectionPicker::unsupported())
}

/// Opaque token for a user-granted backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHandle {
    path: PathBuf,
}

impl DirectoryHandle {
    pub(crate) fn grant(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file inside a granted directory, opened or created for writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    /// The file existed before this backup; the write replaces it.
    pub existed: bool,
}

/// Stream accepting whole-text writes, finished by `close`.
pub trait WritableStream {
    fn write(&mut self, data: &str) -> io::Result<()>;
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Host file-write capability.
pub trait FileWriteCapability {
    /// Opens `name` inside `dir`, creating it when missing.
    fn get_file_handle(&self, dir: &DirectoryHandle, name: &str) -> io::Result<FileHandle>;
    /// Returns a stream that replaces the file contents.
    fn create_writable(&self, file: &FileHandle) -> io::Result<Box<dyn WritableStream>>;
}

/// Native filesystem writer for desktop and server hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileWriter;

impl FileWriteCapability for NativeFileWriter {
    fn get_file_handle(&self, dir: &DirectoryHandle, name: &str) -> io::Result<FileHandle> {
        let path = dir.path().join(name);
        let existed = path.is_file();
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(FileHandle { path, existed })
    }

    fn create_writable(&self, file: &FileHandle) -> io::Result<Box<dyn WritableStream>> {
        let target = File::create(&file.path)?;
        Ok(Box::new(NativeStream {
            writer: BufWriter::new(target),
        }))
    }
}

struct NativeStream {
    writer: BufWriter<File>,
}

impl WritableStream for NativeStream {
    fn write(&mut self, data: &str) -> io::Result<()> {
        self.writer.write_all(data.as_bytes())
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        let file = self.writer.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()
    }
}
