//! Off-days and app configuration persistence.
//!
//! # Invariants
//! - Off-days form a set; adding an existing date is a no-op.
//! - `app_config` holds at most one row; saving replaces it wholesale.

use super::{require_changed, RepoError, RepoResult};
use crate::model::config::AppConfig;
use crate::model::validate_date;
use rusqlite::{params, Connection, OptionalExtension};

pub trait SettingsRepository {
    fn add_off_day(&self, date: &str) -> RepoResult<()>;
    fn remove_off_day(&self, date: &str) -> RepoResult<()>;
    /// Returns off-days sorted ascending.
    fn list_off_days(&self) -> RepoResult<Vec<String>>;
    /// Returns the stored config, or an empty one when none was saved yet.
    fn load_app_config(&self) -> RepoResult<AppConfig>;
    fn save_app_config(&self, config: &AppConfig) -> RepoResult<()>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn add_off_day(&self, date: &str) -> RepoResult<()> {
        validate_date("offDay", date)?;
        self.conn
            .execute("INSERT OR IGNORE INTO off_days (date) VALUES (?1);", [date])?;
        Ok(())
    }

    fn remove_off_day(&self, date: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM off_days WHERE date = ?1;", [date])?;
        require_changed(changed, date)
    }

    fn list_off_days(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM off_days ORDER BY date ASC;")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for date in &dates {
            validate_date("offDay", date)?;
        }
        Ok(dates)
    }

    fn load_app_config(&self) -> RepoResult<AppConfig> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM app_config WHERE id = 1;", [], |row| {
                row.get(0)
            })
            .optional()?;

        match payload {
            Some(text) => serde_json::from_str(&text).map_err(|err| {
                RepoError::InvalidData(format!("app_config.payload is not a JSON object: {err}"))
            }),
            None => Ok(AppConfig::default()),
        }
    }

    fn save_app_config(&self, config: &AppConfig) -> RepoResult<()> {
        let payload = serde_json::to_string(config).map_err(|err| {
            RepoError::InvalidData(format!("app config cannot be encoded: {err}"))
        })?;
        self.conn.execute(
            "INSERT INTO app_config (id, payload) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload;",
            params![payload],
        )?;
        Ok(())
    }
}
