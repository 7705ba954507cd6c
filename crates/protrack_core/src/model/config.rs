//! Opaque application settings carried through backups untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Miscellaneous UI settings.
///
/// Core never interprets the keys; it stores and exports the object verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfig(pub Map<String, Value>);

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
