//! Off-days and app configuration use-cases.

use super::ServiceResult;
use crate::model::config::AppConfig;
use crate::model::validate_date;
use crate::repo::settings_repo::SettingsRepository;
use serde_json::Value;

pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_off_day(&self, date: &str) -> ServiceResult<()> {
        Ok(self.repo.add_off_day(date.trim())?)
    }

    pub fn remove_off_day(&self, date: &str) -> ServiceResult<()> {
        Ok(self.repo.remove_off_day(date.trim())?)
    }

    /// Flips `date` in the off-day set and returns whether it is now an off-day.
    pub fn toggle_off_day(&self, date: &str) -> ServiceResult<bool> {
        let date = date.trim();
        validate_date("offDay", date)?;
        if self.repo.list_off_days()?.iter().any(|day| day == date) {
            self.repo.remove_off_day(date)?;
            return Ok(false);
        }
        self.repo.add_off_day(date)?;
        Ok(true)
    }

    pub fn off_days(&self) -> ServiceResult<Vec<String>> {
        Ok(self.repo.list_off_days()?)
    }

    pub fn app_config(&self) -> ServiceResult<AppConfig> {
        Ok(self.repo.load_app_config()?)
    }

    pub fn replace_app_config(&self, config: &AppConfig) -> ServiceResult<()> {
        Ok(self.repo.save_app_config(config)?)
    }

    pub fn set_config_value(&self, key: &str, value: Value) -> ServiceResult<AppConfig> {
        let mut config = self.repo.load_app_config()?;
        config.set(key, value);
        self.repo.save_app_config(&config)?;
        Ok(config)
    }
}
