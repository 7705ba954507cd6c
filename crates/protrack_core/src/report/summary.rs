//! Seam for the external weekly summary writer.

use super::weekly::WeeklyDigest;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// External collaborator that turns a digest into summary text.
pub trait SummaryGenerator {
    fn summarize(&self, digest: &WeeklyDigest) -> Result<String, SummaryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// The period has no activity; the generator was not called.
    NothingToSummarize,
    /// The generator failed or returned blank text.
    Generator(String),
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToSummarize => write!(f, "no activity recorded in this period"),
            Self::Generator(message) => write!(f, "summary generation failed: {message}"),
        }
    }
}

impl Error for SummaryError {}

/// Runs `generator` over `digest`, skipping empty periods.
pub fn generate_weekly_summary(
    generator: &dyn SummaryGenerator,
    digest: &WeeklyDigest,
) -> Result<String, SummaryError> {
    if digest.is_empty() {
        return Err(SummaryError::NothingToSummarize);
    }

    match generator.summarize(digest) {
        Ok(text) if text.trim().is_empty() => {
            error!("event=weekly_summary module=report status=error error_code=blank_summary");
            Err(SummaryError::Generator("generator returned blank text".to_string()))
        }
        Ok(text) => {
            info!(
                "event=weekly_summary module=report status=ok period_start={} chars={}",
                digest.period_start,
                text.chars().count()
            );
            Ok(text)
        }
        Err(err) => {
            error!("event=weekly_summary module=report status=error error={err}");
            Err(err)
        }
    }
}
