//! Observations log persistence.

use super::{require_changed, RepoError, RepoResult};
use crate::model::observation::{Observation, ObservationStatus};
use rusqlite::{params, Connection, Row};

pub trait ObservationRepository {
    fn create_observation(&self, observation: &Observation) -> RepoResult<()>;
    fn set_observation_status(&self, id: &str, status: ObservationStatus) -> RepoResult<()>;
    fn delete_observation(&self, id: &str) -> RepoResult<()>;
    /// Returns every observation in insertion order.
    fn list_observations(&self) -> RepoResult<Vec<Observation>>;
}

pub struct SqliteObservationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObservationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ObservationRepository for SqliteObservationRepository<'_> {
    fn create_observation(&self, observation: &Observation) -> RepoResult<()> {
        observation.validate()?;
        self.conn.execute(
            "INSERT INTO observations (id, timestamp, content, status) VALUES (?1, ?2, ?3, ?4);",
            params![
                observation.id.as_str(),
                observation.timestamp.as_str(),
                observation.content.as_str(),
                observation.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn set_observation_status(&self, id: &str, status: ObservationStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE observations SET status = ?1 WHERE id = ?2;",
            params![status.as_str(), id],
        )?;
        require_changed(changed, id)
    }

    fn delete_observation(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM observations WHERE id = ?1;", [id])?;
        require_changed(changed, id)
    }

    fn list_observations(&self) -> RepoResult<Vec<Observation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, content, status FROM observations ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut observations = Vec::new();
        while let Some(row) = rows.next()? {
            observations.push(parse_observation_row(row)?);
        }
        Ok(observations)
    }
}

fn parse_observation_row(row: &Row<'_>) -> RepoResult<Observation> {
    let status_text: String = row.get("status")?;
    let status = ObservationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid observation status `{status_text}` in observations.status"
        ))
    })?;

    let observation = Observation {
        id: row.get("id")?,
        timestamp: row.get("timestamp")?,
        content: row.get("content")?,
        status,
    };
    observation.validate()?;
    Ok(observation)
}
