//! Observations log use-cases.

use super::ServiceResult;
use crate::model::new_record_id;
use crate::model::observation::{Observation, ObservationStatus};
use crate::repo::observation_repo::ObservationRepository;
use chrono::{DateTime, SecondsFormat, Utc};

pub struct ObservationService<R: ObservationRepository> {
    repo: R,
}

impl<R: ObservationRepository> ObservationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Logs a new observation stamped with the current UTC time.
    pub fn add_observation(&self, content: &str) -> ServiceResult<Observation> {
        self.add_observation_at(content, Utc::now())
    }

    /// Logs a new observation stamped with `at` (millisecond precision, `Z`).
    pub fn add_observation_at(
        &self,
        content: &str,
        at: DateTime<Utc>,
    ) -> ServiceResult<Observation> {
        let observation = Observation {
            id: new_record_id(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            content: content.trim().to_string(),
            status: ObservationStatus::New,
        };
        self.repo.create_observation(&observation)?;
        Ok(observation)
    }

    pub fn set_status(&self, id: &str, status: ObservationStatus) -> ServiceResult<()> {
        Ok(self.repo.set_observation_status(id, status)?)
    }

    pub fn delete_observation(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_observation(id)?)
    }

    /// Newest observation first.
    pub fn list_newest_first(&self) -> ServiceResult<Vec<Observation>> {
        let mut observations = self.repo.list_observations()?;
        observations.reverse();
        Ok(observations)
    }
}
