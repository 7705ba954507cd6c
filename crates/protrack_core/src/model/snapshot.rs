//! Full-state snapshot exported by backups and consumed by the weekly digest.

use super::config::AppConfig;
use super::journal::DailyLog;
use super::observation::Observation;
use super::task::Task;
use serde::{Deserialize, Serialize};

/// Complete application state at a single point in time.
///
/// Serialized as exactly five top-level keys with no wrapping metadata.
/// Empty collections are always emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub logs: Vec<DailyLog>,
    pub observations: Vec<Observation>,
    pub off_days: Vec<String>,
    pub app_config: AppConfig,
}

impl Snapshot {
    /// Looks up a task by stable id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Returns logs whose `task_id` no longer names a task.
    pub fn orphaned_logs(&self) -> impl Iterator<Item = &DailyLog> {
        self.logs.iter().filter(|log| self.task(&log.task_id).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::journal::DailyLog;

    #[test]
    fn empty_snapshot_emits_every_key() {
        let json = serde_json::to_value(Snapshot::default()).expect("serialize snapshot");
        let object = json.as_object().expect("snapshot is an object");
        let mut keys = object.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        assert_eq!(keys, ["appConfig", "logs", "observations", "offDays", "tasks"]);
        assert!(json["appConfig"].as_object().expect("config object").is_empty());
        assert_eq!(json["offDays"], serde_json::json!([]));
    }

    #[test]
    fn orphaned_logs_are_reported_not_dropped() {
        let snapshot = Snapshot {
            logs: vec![DailyLog {
                id: "l1".to_string(),
                date: "2024-03-05".to_string(),
                task_id: "gone".to_string(),
                content: "kept anyway".to_string(),
            }],
            ..Snapshot::default()
        };
        assert_eq!(snapshot.orphaned_logs().count(), 1);
        assert_eq!(snapshot.logs.len(), 1);
    }
}
