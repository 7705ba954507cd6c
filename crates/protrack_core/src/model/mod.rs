//! Application state model for the task board, journal and observations log.
//!
//! # Responsibility
//! - Define the records owned by the application state.
//! - Define the `Snapshot` aggregate exported by backups.
//! - Provide field validation shared by repositories and services.
//!
//! # Invariants
//! - Wire names are camelCase and match the backup artifact exactly.
//! - Calendar dates are canonical `YYYY-MM-DD` strings.
//! - Validation never rewrites a record; it only accepts or rejects it.

pub mod config;
pub mod journal;
pub mod observation;
pub mod snapshot;
pub mod task;
mod validation;

pub use validation::{validate_date, ModelValidationError};

/// Generates a fresh record identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
