//! Weekly digest assembly.
//!
//! # Invariants
//! - A period runs Monday through Sunday.
//! - Working days are Monday..Friday minus off-days.
//! - Journal entries dated on weekends or off-days are left out.
//! - Entries whose task no longer exists are kept under their raw task id.

use crate::model::snapshot::Snapshot;
use crate::model::task::{Task, TaskStatus};
use crate::model::validate_date;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};
use log::warn;
use serde::Serialize;
use std::collections::BTreeSet;

const DAYS_PER_WEEK: i64 = 7;

/// Monday-to-Sunday reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// The week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        let start = date - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(DAYS_PER_WEEK - 1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }

    /// Weekdays of the period that are not off-days.
    pub fn working_days(&self, off_days: &BTreeSet<NaiveDate>) -> Vec<NaiveDate> {
        self.days()
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .filter(|day| !off_days.contains(day))
            .collect()
    }
}

/// Short reference to a task in digest output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub id: String,
    pub display_id: String,
    pub description: String,
    pub due_date: String,
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            display_id: task.display_id.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestEntry {
    pub date: String,
    pub content: String,
}

/// Journal activity grouped under one task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActivity {
    pub task_id: String,
    /// `None` when the task was deleted after the entries were written.
    pub task: Option<TaskRef>,
    pub status: Option<TaskStatus>,
    pub entries: Vec<DigestEntry>,
}

/// Data handed to the summary writer for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDigest {
    pub period_start: String,
    pub period_end: String,
    pub working_days: Vec<String>,
    /// Off-days that fell on weekdays of this period.
    pub excluded_off_days: Vec<String>,
    pub task_activity: Vec<TaskActivity>,
    pub completed_tasks: Vec<TaskRef>,
    pub open_tasks_due: Vec<TaskRef>,
    pub observations: Vec<DigestEntry>,
}

impl WeeklyDigest {
    pub fn build(snapshot: &Snapshot, period: ReportPeriod) -> Self {
        let off_days = parse_off_days(&snapshot.off_days);
        let working_days = period.working_days(&off_days);
        let working_set = working_days.iter().copied().collect::<BTreeSet<_>>();

        let excluded_off_days = period
            .days()
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .filter(|day| off_days.contains(day))
            .map(|day| day.to_string())
            .collect();

        let mut dated_logs = snapshot
            .logs
            .iter()
            .filter_map(|log| {
                let date = validate_date("date", &log.date).ok()?;
                working_set.contains(&date).then_some((date, log))
            })
            .collect::<Vec<_>>();
        dated_logs.sort_by_key(|(date, _)| *date);

        let mut task_activity: Vec<TaskActivity> = Vec::new();
        for (_, log) in &dated_logs {
            let entry = DigestEntry {
                date: log.date.clone(),
                content: log.content.clone(),
            };
            match task_activity
                .iter_mut()
                .find(|activity| activity.task_id == log.task_id)
            {
                Some(activity) => activity.entries.push(entry),
                None => {
                    let task = snapshot.task(&log.task_id);
                    task_activity.push(TaskActivity {
                        task_id: log.task_id.clone(),
                        task: task.map(TaskRef::from),
                        status: task.map(|task| task.status),
                        entries: vec![entry],
                    });
                }
            }
        }

        let due_in_period = |task: &&Task| {
            validate_date("dueDate", &task.due_date)
                .map(|due| period.contains(due))
                .unwrap_or(false)
        };
        let active_ids = task_activity
            .iter()
            .map(|activity| activity.task_id.as_str())
            .collect::<BTreeSet<_>>();

        let completed_tasks = snapshot
            .tasks
            .iter()
            .filter(|task| task.status.is_done())
            .filter(|task| due_in_period(task) || active_ids.contains(task.id.as_str()))
            .map(TaskRef::from)
            .collect();

        let open_tasks_due = snapshot
            .tasks
            .iter()
            .filter(|task| !task.status.is_done())
            .filter(due_in_period)
            .map(TaskRef::from)
            .collect();

        let observations = snapshot
            .observations
            .iter()
            .filter_map(|observation| {
                let stamped = DateTime::parse_from_rfc3339(&observation.timestamp).ok()?;
                period
                    .contains(stamped.date_naive())
                    .then(|| DigestEntry {
                        date: stamped.date_naive().to_string(),
                        content: observation.content.clone(),
                    })
            })
            .collect();

        Self {
            period_start: period.start.to_string(),
            period_end: period.end.to_string(),
            working_days: working_days.iter().map(|day| day.to_string()).collect(),
            excluded_off_days,
            task_activity,
            completed_tasks,
            open_tasks_due,
            observations,
        }
    }

    /// `true` when nothing happened in the period worth summarizing.
    pub fn is_empty(&self) -> bool {
        self.task_activity.is_empty()
            && self.completed_tasks.is_empty()
            && self.open_tasks_due.is_empty()
            && self.observations.is_empty()
    }
}

fn parse_off_days(raw: &[String]) -> BTreeSet<NaiveDate> {
    raw.iter()
        .filter_map(|value| match validate_date("offDay", value) {
            Ok(date) => Some(date),
            Err(err) => {
                warn!("event=digest_build module=report status=skip_off_day error={err}");
                None
            }
        })
        .collect()
}
