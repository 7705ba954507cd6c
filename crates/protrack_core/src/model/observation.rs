//! Freeform observations log record.

use super::validation::{require_text, validate_timestamp, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Review state of an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObservationStatus {
    #[default]
    New,
    Reviewing,
    Resolved,
    Archived,
}

impl ObservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Reviewing => "REVIEWING",
            Self::Resolved => "RESOLVED",
            Self::Archived => "ARCHIVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NEW" => Some(Self::New),
            "REVIEWING" => Some(Self::Reviewing),
            "RESOLVED" => Some(Self::Resolved),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A timestamped freeform note about the tool or the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
    pub content: String,
    /// Older exports carry no status; they read back as `NEW`.
    #[serde(default)]
    pub status: ObservationStatus,
}

impl Observation {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("id", &self.id)?;
        validate_timestamp("timestamp", &self.timestamp)?;
        require_text("content", &self.content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Observation, ObservationStatus};

    #[test]
    fn missing_status_defaults_to_new() {
        let observation: Observation = serde_json::from_str(
            r#"{"id":"o1","timestamp":"2024-03-05T14:32:00Z","content":"slow sync"}"#,
        )
        .expect("decode observation");
        assert_eq!(observation.status, ObservationStatus::New);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ObservationStatus::New,
            ObservationStatus::Reviewing,
            ObservationStatus::Resolved,
            ObservationStatus::Archived,
        ] {
            assert_eq!(ObservationStatus::parse(status.as_str()), Some(status));
        }
    }
}
