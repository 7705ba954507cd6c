use chrono::{DateTime, Utc};
use protrack_core::db::open_db_in_memory;
use protrack_core::{AppStore, NewTask, ObservationStatus, ServiceError};

fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

#[test]
fn add_log_trims_content_and_lists_newest_first_per_day() {
    let conn = open_db_in_memory().unwrap();
    let journal = AppStore::new(&conn).journal();

    let first = journal.add_log("2024-03-05", "t1", "  drafted outline ").unwrap();
    let second = journal.add_log("2024-03-05", "t1", "reviewed draft").unwrap();
    journal.add_log("2024-03-06", "t1", "next day").unwrap();

    assert_eq!(first.content, "drafted outline");
    let day = journal.logs_for_date("2024-03-05").unwrap();
    let ids = day.iter().map(|log| log.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, [second.id.as_str(), first.id.as_str()]);
}

#[test]
fn add_log_rejects_blank_content_and_missing_task_reference() {
    let conn = open_db_in_memory().unwrap();
    let journal = AppStore::new(&conn).journal();

    assert!(matches!(
        journal.add_log("2024-03-05", "t1", "   "),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        journal.add_log("2024-03-05", "", "content"),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        journal.add_log("2024-3-5", "t1", "content"),
        Err(ServiceError::InvalidInput(_))
    ));
}

#[test]
fn logs_outlive_deleted_tasks() {
    let conn = open_db_in_memory().unwrap();
    let store = AppStore::new(&conn);
    let task = store
        .tasks()
        .create_task(NewTask {
            display_id: "CW01".to_string(),
            description: "Test".to_string(),
            due_date: "2024-03-08".to_string(),
            priority: 1,
        })
        .unwrap();
    store.journal().add_log("2024-03-05", &task.id, "progress").unwrap();

    store.tasks().delete_task(&task.id).unwrap();

    let logs = store.journal().logs_for_task(&task.id).unwrap();
    assert_eq!(logs.len(), 1);
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.orphaned_logs().count(), 1);
}

#[test]
fn observations_are_stamped_listed_newest_first_and_reviewable() {
    let conn = open_db_in_memory().unwrap();
    let observations = AppStore::new(&conn).observations();

    let older = observations
        .add_observation_at(" sync is slow ", at("2024-03-05T09:00:00Z"))
        .unwrap();
    let newer = observations
        .add_observation_at("export works", at("2024-03-06T10:30:00Z"))
        .unwrap();
    assert_eq!(older.content, "sync is slow");
    assert_eq!(older.timestamp, "2024-03-05T09:00:00.000Z");
    assert_eq!(older.status, ObservationStatus::New);

    observations
        .set_status(&older.id, ObservationStatus::Resolved)
        .unwrap();
    let listed = observations.list_newest_first().unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].status, ObservationStatus::Resolved);

    observations.delete_observation(&newer.id).unwrap();
    assert_eq!(observations.list_newest_first().unwrap().len(), 1);
    assert!(matches!(
        observations.delete_observation(&newer.id),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn blank_observation_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let observations = AppStore::new(&conn).observations();
    assert!(matches!(
        observations.add_observation("\n\t"),
        Err(ServiceError::InvalidInput(_))
    ));
}

#[test]
fn delete_log_removes_entry_and_reports_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let journal = AppStore::new(&conn).journal();
    let kept = journal.add_log("2024-03-05", "t1", "kept").unwrap();
    let removed = journal.add_log("2024-03-05", "t1", "removed").unwrap();

    journal.delete_log(&removed.id).unwrap();

    let remaining = journal.logs_for_date("2024-03-05").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
    assert!(matches!(
        journal.delete_log(&removed.id),
        Err(ServiceError::NotFound(id)) if id == removed.id
    ));
}
