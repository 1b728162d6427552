// src/errors.rs

//! Crate-wide error type, aliases and helpers.

use thiserror::Error;

use crate::types::ActivityId;

/// Broad classification of a [`PertError`].
///
/// Callers use this to tell bad input apart from engine defects and from
/// query mistakes that leave an already-computed schedule intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad project data; the caller should fix the input and retry.
    Input,
    /// An engine invariant was violated. Always a bug.
    Internal,
    /// A probability query was malformed.
    Query,
    /// Reading or decoding the project file failed.
    Io,
}

#[derive(Error, Debug)]
pub enum PertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("project contains no activities")]
    EmptyProject,

    #[error("duplicate activity id '{0}'")]
    DuplicateActivity(ActivityId),

    #[error("invalid estimate for activity '{activity}': {reason}")]
    InvalidEstimate { activity: ActivityId, reason: String },

    #[error("activity '{activity}' references unknown predecessor '{predecessor}'")]
    UnknownPredecessor {
        activity: ActivityId,
        predecessor: ActivityId,
    },

    #[error("Cycle detected in activity graph: {}", .members.join(" -> "))]
    CycleDetected { members: Vec<ActivityId> },

    #[error("inconsistent schedule: activity '{activity}' has negative slack {slack}")]
    InconsistentSchedule { activity: ActivityId, slack: f64 },

    #[error("no zero-slack chain from a source to a sink (project duration {project_duration})")]
    NoCriticalPath { project_duration: f64 },

    #[error("invalid range: high ({high}) must be greater than low ({low})")]
    InvalidRange { low: f64, high: f64 },

    #[error("degenerate variance {0}: completion time has no spread")]
    DegenerateVariance(f64),

    #[error("invalid confidence level {0}: expected a value strictly between 0 and 1")]
    InvalidConfidence(f64),

    #[error("invalid target duration {0}")]
    InvalidTarget(f64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PertError::ConfigError(_)
            | PertError::EmptyProject
            | PertError::DuplicateActivity(_)
            | PertError::InvalidEstimate { .. }
            | PertError::UnknownPredecessor { .. }
            | PertError::CycleDetected { .. } => ErrorCategory::Input,
            PertError::InconsistentSchedule { .. } | PertError::NoCriticalPath { .. } => {
                ErrorCategory::Internal
            }
            PertError::InvalidRange { .. }
            | PertError::DegenerateVariance(_)
            | PertError::InvalidConfidence(_)
            | PertError::InvalidTarget(_) => ErrorCategory::Query,
            PertError::IoError(_)
            | PertError::TomlError(_)
            | PertError::CsvError(_)
            | PertError::Other(_) => ErrorCategory::Io,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_members_in_order() {
        let err = PertError::CycleDetected {
            members: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "Cycle detected in activity graph: A -> B");
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn negative_slack_is_internal() {
        let err = PertError::InconsistentSchedule {
            activity: "X".to_string(),
            slack: -1.0,
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(
            PertError::NoCriticalPath { project_duration: 3.0 }.category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn query_errors_are_classified_separately() {
        assert_eq!(
            PertError::InvalidRange { low: 2.0, high: 1.0 }.category(),
            ErrorCategory::Query
        );
        assert_eq!(PertError::DegenerateVariance(0.0).category(), ErrorCategory::Query);
    }
}
