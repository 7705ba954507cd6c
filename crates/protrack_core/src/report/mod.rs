//! Reporting-period digests consumed by the external weekly summary writer.
//!
//! Core only assembles the data. Turning it into prose is delegated to a
//! `SummaryGenerator` supplied by the host.

mod summary;
mod weekly;

pub use summary::{generate_weekly_summary, SummaryError, SummaryGenerator};
pub use weekly::{DigestEntry, ReportPeriod, TaskActivity, TaskRef, WeeklyDigest};
