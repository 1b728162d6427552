// src/engine/mod.rs

//! CPM/PERT computation engine.
//!
//! Stages, each consuming the previous stage's immutable output:
//! - [`estimator`]: three-point estimates → expected duration and variance
//! - [`scheduler`]: forward/backward passes → earliest/latest times
//! - [`critical`]: slack, critical membership, critical paths
//! - [`probability`]: completion probabilities from a path's distribution
//!
//! [`analyze_project`] runs the first three in order; probability queries
//! are answered afterwards from [`ProjectAnalysis::distribution`].

pub mod critical;
pub mod estimator;
pub mod probability;
pub mod scheduler;

use tracing::info;

use crate::dag::ProjectGraph;
use crate::errors::Result;

pub use critical::{ActivityFloat, AnalysisOptions, CriticalPath, CriticalPathResult, analyze};
pub use estimator::{Estimate, Estimates, estimate, estimate_all};
pub use probability::{
    ProjectDistribution, duration_at_confidence, probability_between,
    probability_of_completion_by, z_score,
};
pub use scheduler::{Schedule, ScheduleEntry, schedule};

/// Output of the full pipeline for one project graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAnalysis {
    pub estimates: Estimates,
    pub schedule: Schedule,
    pub critical: CriticalPathResult,
}

impl ProjectAnalysis {
    pub fn project_duration(&self) -> f64 {
        self.schedule.project_duration()
    }

    /// Distribution of the primary critical path, if one was found.
    pub fn distribution(&self) -> Option<ProjectDistribution> {
        self.critical.project_distribution()
    }
}

/// Estimate, schedule and analyze a validated graph.
pub fn analyze_project(graph: &ProjectGraph, options: &AnalysisOptions) -> Result<ProjectAnalysis> {
    let estimates = estimate_all(graph);
    let schedule = schedule(graph, &estimates)?;
    let critical = analyze(graph, &estimates, &schedule, options)?;

    info!(
        activities = graph.len(),
        project_duration = schedule.project_duration(),
        critical_paths = critical.paths().len(),
        "project analysis complete"
    );

    Ok(ProjectAnalysis {
        estimates,
        schedule,
        critical,
    })
}
