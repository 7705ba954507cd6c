//! Host path configuration.
//!
//! Hosts resolve one `CorePaths` at startup: explicit values win, then the
//! `PROTRACK_DB_PATH` environment variable, then a temp-dir default.

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PROTRACK_DB_PATH";
pub const DEFAULT_DB_FILE_NAME: &str = "protrack.sqlite3";

/// Filesystem locations used by a host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorePaths {
    pub db_path: PathBuf,
    pub log_dir: Option<PathBuf>,
}

impl CorePaths {
    /// Resolves paths from explicit values and the process environment.
    pub fn resolve(db_path: Option<PathBuf>, log_dir: Option<PathBuf>) -> Self {
        Self::resolve_with(db_path, log_dir, std::env::var(DB_PATH_ENV).ok())
    }

    fn resolve_with(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        env_db_path: Option<String>,
    ) -> Self {
        let db_path = db_path
            .or_else(|| {
                env_db_path
                    .map(|raw| raw.trim().to_string())
                    .filter(|raw| !raw.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_db_path);
        Self { db_path, log_dir }
    }
}

pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
