use chrono::{DateTime, Duration, FixedOffset};
use protrack_core::backup::{
    BackupError, BackupGateway, DirectoryHandle, FileHandle, FileWriteCapability, FixedClock,
    HostSelectionPicker, NativeFileWriter, WritableStream, WriteStage,
};
use protrack_core::Snapshot;
use serde_json::{json, Value};
use std::io;
use std::path::Path;

fn instant(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

fn gateway_at(
    dir: &Path,
    raw: &str,
) -> BackupGateway<HostSelectionPicker, NativeFileWriter, FixedClock> {
    BackupGateway::new(
        HostSelectionPicker::selected(dir),
        NativeFileWriter,
        FixedClock(instant(raw)),
    )
}

fn example_snapshot_json() -> Value {
    json!({
        "tasks": [{
            "id": "1",
            "displayId": "CW01",
            "description": "Test",
            "status": "DONE",
            "dueDate": "2024-01-01",
            "priority": 1
        }],
        "logs": [],
        "observations": [],
        "offDays": [],
        "appConfig": {}
    })
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn writes_example_snapshot_under_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway = gateway_at(dir.path(), "2024-03-05T14:32:00Z");
    let snapshot: Snapshot = serde_json::from_value(example_snapshot_json()).unwrap();

    let handle = gateway.acquire_directory_access().unwrap().unwrap();
    assert!(gateway.write_backup(&handle, &snapshot));

    let path = dir.path().join("ProTrack_Backup_2024-03-05_14-32.json");
    assert_eq!(read_json(&path), example_snapshot_json());
}

#[test]
fn written_file_round_trips_into_identical_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway = gateway_at(dir.path(), "2024-03-05T14:32:00Z");
    let snapshot: Snapshot = serde_json::from_value(json!({
        "tasks": [
            {"id": "a", "displayId": "CW01", "description": "", "status": "NOT_STARTED", "dueDate": "2024-03-08", "priority": 0},
            {"id": "b", "displayId": "CW02", "description": "ünïcode ✓", "status": "IN_PROGRESS", "dueDate": "2024-03-09", "priority": 7}
        ],
        "logs": [{"id": "l1", "date": "2024-03-05", "taskId": "deleted-task", "content": "line one\nline two"}],
        "observations": [{"id": "o1", "timestamp": "2024-03-05T09:00:00.000Z", "content": "quote \" inside", "status": "REVIEWING"}],
        "offDays": ["2024-03-06"],
        "appConfig": {"theme": "dark", "nested": {"list": [1, 2, 3]}}
    }))
    .unwrap();

    let handle = gateway.acquire_directory_access().unwrap().unwrap();
    let receipt = gateway.try_write_backup(&handle, &snapshot).unwrap();

    let text = std::fs::read_to_string(&receipt.path).unwrap();
    assert_eq!(receipt.bytes_written, text.len());
    let parsed: Snapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn output_uses_two_space_indentation_and_no_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway = gateway_at(dir.path(), "2024-03-05T14:32:00Z");
    let handle = gateway.acquire_directory_access().unwrap().unwrap();
    let receipt = gateway
        .try_write_backup(&handle, &Snapshot::default())
        .unwrap();

    let text = std::fs::read_to_string(&receipt.path).unwrap();
    assert!(text.starts_with("{\n  \"tasks\": []"));
    let parsed = read_json(&receipt.path);
    assert_eq!(
        parsed,
        json!({"tasks": [], "logs": [], "observations": [], "offDays": [], "appConfig": {}})
    );
}

#[test]
fn same_minute_backups_overwrite_and_later_minutes_add_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut first_gateway = gateway_at(dir.path(), "2024-03-05T14:32:05Z");
    let handle = first_gateway.acquire_directory_access().unwrap().unwrap();

    let mut first = Snapshot::default();
    first.off_days.push("2024-03-01".to_string());
    let receipt = first_gateway.try_write_backup(&handle, &first).unwrap();
    assert!(!receipt.overwritten);

    let same_minute = gateway_at(dir.path(), "2024-03-05T14:32:55Z");
    let second = Snapshot::default();
    let receipt = same_minute.try_write_backup(&handle, &second).unwrap();
    assert!(receipt.overwritten);
    assert_eq!(receipt.file_name, "ProTrack_Backup_2024-03-05_14-32.json");
    let stored: Snapshot = serde_json::from_value(read_json(&receipt.path)).unwrap();
    assert_eq!(stored, second);

    let later = BackupGateway::new(
        HostSelectionPicker::selected(dir.path()),
        NativeFileWriter,
        FixedClock(instant("2024-03-05T14:32:55Z") + Duration::seconds(61)),
    );
    assert!(later.write_backup(&handle, &first));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn unavailable_picker_fails_without_prompting() {
    let mut gateway = BackupGateway::native(HostSelectionPicker::unsupported());
    let err = gateway.acquire_directory_access().unwrap_err();
    assert!(matches!(err, BackupError::CapabilityUnavailable));
}

#[test]
fn cancelled_picker_yields_no_handle_and_no_error() {
    let mut gateway = BackupGateway::native(HostSelectionPicker::cancelled());
    assert_eq!(gateway.acquire_directory_access().unwrap(), None);
}

#[test]
fn picker_failure_and_non_directory_are_access_errors() {
    let mut gateway = BackupGateway::native(HostSelectionPicker::failed("permission denied"));
    match gateway.acquire_directory_access().unwrap_err() {
        BackupError::AccessError(message) => assert_eq!(message, "permission denied"),
        other => panic!("unexpected error: {other}"),
    }

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    std::fs::write(&file, "x").unwrap();
    let mut gateway = BackupGateway::native(HostSelectionPicker::selected(&file));
    assert!(matches!(
        gateway.acquire_directory_access(),
        Err(BackupError::AccessError(_))
    ));

    let mut gateway = BackupGateway::native(HostSelectionPicker::selected(dir.path().join("missing")));
    assert!(matches!(
        gateway.acquire_directory_access(),
        Err(BackupError::AccessError(_))
    ));
}

#[test]
fn vanished_directory_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("backups");
    std::fs::create_dir(&target).unwrap();
    let mut gateway = gateway_at(&target, "2024-03-05T14:32:00Z");
    let handle = gateway.acquire_directory_access().unwrap().unwrap();

    std::fs::remove_dir(&target).unwrap();
    assert!(!gateway.write_backup(&handle, &Snapshot::default()));
    match gateway.try_write_backup(&handle, &Snapshot::default()) {
        Err(BackupError::WriteFailure { stage, .. }) => assert_eq!(stage, WriteStage::OpenFile),
        other => panic!("unexpected result: {other:?}"),
    }
}

/// Native writer that fails at one chosen protocol stage.
struct FailingWriter {
    stage: WriteStage,
}

struct FailingStream {
    stage: WriteStage,
    inner: Box<dyn WritableStream>,
}

fn injected() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "injected failure")
}

impl FileWriteCapability for FailingWriter {
    fn get_file_handle(&self, dir: &DirectoryHandle, name: &str) -> io::Result<FileHandle> {
        if self.stage == WriteStage::OpenFile {
            return Err(injected());
        }
        NativeFileWriter.get_file_handle(dir, name)
    }

    fn create_writable(&self, file: &FileHandle) -> io::Result<Box<dyn WritableStream>> {
        if self.stage == WriteStage::CreateStream {
            return Err(injected());
        }
        let inner = NativeFileWriter.create_writable(file)?;
        Ok(Box::new(FailingStream {
            stage: self.stage,
            inner,
        }))
    }
}

impl WritableStream for FailingStream {
    fn write(&mut self, data: &str) -> io::Result<()> {
        if self.stage == WriteStage::Write {
            return Err(injected());
        }
        self.inner.write(data)
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        if self.stage == WriteStage::Close {
            return Err(injected());
        }
        self.inner.close()
    }
}

#[test]
fn every_write_stage_failure_collapses_to_false_with_stage_detail() {
    for stage in [
        WriteStage::OpenFile,
        WriteStage::CreateStream,
        WriteStage::Write,
        WriteStage::Close,
    ] {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = BackupGateway::new(
            HostSelectionPicker::selected(dir.path()),
            FailingWriter { stage },
            FixedClock(instant("2024-03-05T14:32:00Z")),
        );
        let handle = gateway.acquire_directory_access().unwrap().unwrap();

        assert!(!gateway.write_backup(&handle, &Snapshot::default()));
        match gateway.try_write_backup(&handle, &Snapshot::default()) {
            Err(BackupError::WriteFailure { stage: failed, source }) => {
                assert_eq!(failed, stage);
                assert!(source.to_string().contains("injected"));
            }
            other => panic!("unexpected result for {stage:?}: {other:?}"),
        }
    }
}

#[test]
fn failed_backup_leaves_earlier_backups_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut good = gateway_at(dir.path(), "2024-03-05T14:00:00Z");
    let handle = good.acquire_directory_access().unwrap().unwrap();
    let earlier: Snapshot = serde_json::from_value(example_snapshot_json()).unwrap();
    let receipt = good.try_write_backup(&handle, &earlier).unwrap();

    let failing = BackupGateway::new(
        HostSelectionPicker::selected(dir.path()),
        FailingWriter {
            stage: WriteStage::CreateStream,
        },
        FixedClock(instant("2024-03-05T15:00:00Z")),
    );
    assert!(!failing.write_backup(&handle, &Snapshot::default()));

    assert_eq!(read_json(&receipt.path), example_snapshot_json());
}
