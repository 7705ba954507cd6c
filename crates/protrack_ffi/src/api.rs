//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Let the shell run its own folder dialog and hand the result to core.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as envelopes with `ok=false` and a message.
//! - The backup directory is re-validated on every call; nothing is cached.

use log::error;
use protrack_core::backup::HostSelectionPicker;
use protrack_core::db::open_db;
use protrack_core::model::validate_date;
use protrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, select_folder,
    AppStore, BackupGateway, BackupService, CorePaths, NewTask, RepoError, ReportPeriod,
    ServiceError, ServiceResult, WeeklyDigest,
};
use std::path::PathBuf;
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the state store path for this process.
///
/// Must run before the first data call; later calls with the same path are
/// no-ops and a different path is rejected. Returns an empty string on
/// success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Generic action envelope for create calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created record on success.
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Folder selection envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderResponse {
    /// Granted directory; `None` when cancelled or failed.
    pub dir: Option<String>,
    /// Alert to show; `None` for success and for silent cancel.
    pub notice: Option<String>,
}

/// Backup result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResponse {
    pub ok: bool,
    pub file_name: Option<String>,
    pub message: String,
}

/// Validates the outcome of the shell's own folder dialog.
///
/// Does not open the state store.
///
/// Input semantics:
/// - `picker_supported=false`: the platform has no folder dialog.
/// - `picked_dir=None` with no `picker_error`: the user cancelled.
/// - `picker_error`: the dialog failed for another reason.
#[flutter_rust_bridge::frb(sync)]
pub fn pick_backup_folder(
    picker_supported: bool,
    picked_dir: Option<String>,
    picker_error: Option<String>,
) -> FolderResponse {
    let picker = host_picker(picker_supported, picked_dir, picker_error);
    let selection = select_folder(&mut BackupGateway::native(picker));
    FolderResponse {
        dir: selection
            .handle
            .map(|handle| handle.path().to_string_lossy().into_owned()),
        notice: selection.notice,
    }
}

/// Writes a backup of the full state into a previously picked folder.
#[flutter_rust_bridge::frb(sync)]
pub fn perform_backup(dir: String) -> BackupResponse {
    let conn = match open_db(resolve_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=ffi_backup module=ffi status=error error_code=db_open_failed error={err}");
            return BackupResponse {
                ok: false,
                file_name: None,
                message: format!("perform_backup failed: {err}"),
            };
        }
    };
    let picker = HostSelectionPicker::selected(dir.trim());
    let mut service = BackupService::new(AppStore::new(&conn), BackupGateway::native(picker));
    match service.backup_now() {
        Some(outcome) => BackupResponse {
            ok: outcome.ok,
            file_name: outcome.file_name,
            message: outcome.message,
        },
        None => BackupResponse {
            ok: false,
            file_name: None,
            message: "Backup cancelled.".to_string(),
        },
    }
}

/// Creates a task card.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(
    display_id: String,
    description: String,
    due_date: String,
    priority: u32,
) -> ActionResponse {
    let input = NewTask {
        display_id,
        description,
        due_date,
        priority,
    };
    with_store("task_create", |store| {
        store.tasks().create_task(input).map(|task| task.id)
    })
    .map_or_else(ActionResponse::failure, |id| {
        ActionResponse::success("Task created.", id)
    })
}

/// Logs journal progress against a task.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_add(date: String, task_id: String, content: String) -> ActionResponse {
    with_store("journal_add", |store| {
        store
            .journal()
            .add_log(&date, &task_id, &content)
            .map(|log| log.id)
    })
    .map_or_else(ActionResponse::failure, |id| {
        ActionResponse::success("Activity logged.", id)
    })
}

/// Adds an observation stamped with the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn observation_add(content: String) -> ActionResponse {
    with_store("observation_add", |store| {
        store
            .observations()
            .add_observation(&content)
            .map(|observation| observation.id)
    })
    .map_or_else(ActionResponse::failure, |id| {
        ActionResponse::success("Observation saved.", id)
    })
}

/// Weekly digest for the week containing `week_of`, as JSON for the
/// summary writer. Returns `{"error": ...}` JSON on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn weekly_digest_json(week_of: String) -> String {
    let result = with_store("weekly_digest_json", |store| {
        let anchor = validate_date("weekOf", week_of.trim())?;
        let digest = WeeklyDigest::build(&store.snapshot()?, ReportPeriod::week_of(anchor));
        serde_json::to_string(&digest)
            .map_err(|err| ServiceError::Repo(RepoError::InvalidData(err.to_string())))
    });
    match result {
        Ok(json) => json,
        Err(message) => serde_json::json!({ "error": message }).to_string(),
    }
}

fn host_picker(
    supported: bool,
    picked_dir: Option<String>,
    picker_error: Option<String>,
) -> HostSelectionPicker {
    if !supported {
        return HostSelectionPicker::unsupported();
    }
    if let Some(message) = picker_error {
        return HostSelectionPicker::failed(message);
    }
    match picked_dir.map(|dir| dir.trim().to_string()) {
        Some(dir) if !dir.is_empty() => HostSelectionPicker::selected(dir),
        _ => HostSelectionPicker::cancelled(),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| CorePaths::resolve(None, None).db_path)
        .clone()
}

fn with_store<T>(
    operation: &str,
    f: impl FnOnce(AppStore<'_>) -> ServiceResult<T>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("{operation} failed: {err}"))?;
    f(AppStore::new(&conn)).map_err(|err| format!("{operation} failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, init_logging, journal_add, perform_backup,
        pick_backup_folder, task_create, weekly_digest_json,
    };
    use std::sync::Mutex;

    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn test_db() -> std::sync::MutexGuard<'static, ()> {
        let guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = std::env::temp_dir().join(format!(
            "protrack-ffi-test-{}.sqlite3",
            std::process::id()
        ));
        let error = configure_db_path(path.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
        guard
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_db_path_rejects_switching() {
        let _guard = test_db();
        let error = configure_db_path("/somewhere/else.sqlite3".to_string());
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn pick_backup_folder_maps_host_outcomes() {
        let _guard = test_db();

        let unsupported = pick_backup_folder(false, None, None);
        assert!(unsupported.dir.is_none());
        assert!(unsupported.notice.is_some());

        let cancelled = pick_backup_folder(true, None, None);
        assert!(cancelled.dir.is_none());
        assert!(cancelled.notice.is_none());

        let failed = pick_backup_folder(true, None, Some("denied".to_string()));
        assert_eq!(
            failed.notice.as_deref(),
            Some("Could not access folder. denied")
        );

        let dir = tempfile::tempdir().unwrap();
        let picked = pick_backup_folder(
            true,
            Some(dir.path().to_string_lossy().into_owned()),
            None,
        );
        assert!(picked.dir.is_some());
        assert!(picked.notice.is_none());
    }

    #[test]
    fn perform_backup_writes_a_json_file() {
        let _guard = test_db();
        let created = task_create(
            "CW01".to_string(),
            "Test".to_string(),
            "2024-01-01".to_string(),
            1,
        );
        assert!(created.ok, "{}", created.message);

        let dir = tempfile::tempdir().unwrap();
        let response = perform_backup(dir.path().to_string_lossy().into_owned());
        assert!(response.ok, "{}", response.message);

        let file_name = response.file_name.unwrap();
        assert!(file_name.starts_with("ProTrack_Backup_"));
        let text = std::fs::read_to_string(dir.path().join(&file_name)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let task_id = created.id.unwrap();
        assert!(json["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .any(|task| task["id"] == task_id.as_str()));
    }

    #[test]
    fn perform_backup_into_missing_folder_fails_with_notice() {
        let _guard = test_db();
        let dir = tempfile::tempdir().unwrap();
        let response = perform_backup(dir.path().join("missing").to_string_lossy().into_owned());
        assert!(!response.ok);
        assert!(response.message.starts_with("Could not access folder."));
    }

    #[test]
    fn journal_add_rejects_blank_content() {
        let _guard = test_db();
        let response = journal_add("2024-03-05".to_string(), "t1".to_string(), "  ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("journal_add failed"));
    }

    #[test]
    fn weekly_digest_json_reports_bad_dates_as_error_json() {
        let _guard = test_db();
        let json: serde_json::Value =
            serde_json::from_str(&weekly_digest_json("soon".to_string())).unwrap();
        assert!(json["error"].as_str().unwrap().contains("weekOf"));

        let json: serde_json::Value =
            serde_json::from_str(&weekly_digest_json("2024-03-05".to_string())).unwrap();
        assert_eq!(json["periodStart"], "2024-03-04");
    }
}
