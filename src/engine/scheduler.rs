// src/engine/scheduler.rs

//! Forward/backward pass scheduling.

use std::collections::HashMap;

use anyhow::anyhow;
use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::dag::ProjectGraph;
use crate::engine::estimator::Estimates;
use crate::errors::{PertError, Result};
use crate::types::ActivityId;

/// Timing of one activity.
///
/// Column names in the usual CPM tables: TIC = `earliest_start`,
/// TFC = `earliest_finish`, TIL = `latest_start`, TFL = `latest_finish`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub activity: ActivityId,
    /// Expected duration `te` used for this entry.
    pub duration: f64,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
}

impl ScheduleEntry {
    /// Raw total float, `TIL - TIC`. May carry rounding noise around zero;
    /// `engine::critical` applies the tolerance.
    pub fn slack(&self) -> f64 {
        self.latest_start - self.earliest_start
    }
}

/// Result of both passes over a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    positions: HashMap<ActivityId, usize>,
    order: Vec<NodeIndex>,
    project_duration: f64,
}

impl Schedule {
    /// Maximum earliest finish over all sinks.
    pub fn project_duration(&self) -> f64 {
        self.project_duration
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&ScheduleEntry> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    pub(crate) fn at(&self, idx: NodeIndex) -> &ScheduleEntry {
        &self.entries[idx.index()]
    }

    /// The topological order both passes used.
    pub fn topological_order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub(crate) fn from_parts(
        entries: Vec<ScheduleEntry>,
        order: Vec<NodeIndex>,
        project_duration: f64,
    ) -> Self {
        let positions = entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.activity.clone(), pos))
            .collect();
        Self {
            entries,
            positions,
            order,
            project_duration,
        }
    }
}

/// Run the forward and backward passes.
///
/// Fails with `CycleDetected` if the graph cannot be ordered; a graph from
/// `dag::build` never triggers that.
pub fn schedule(graph: &ProjectGraph, estimates: &Estimates) -> Result<Schedule> {
    if estimates.len() != graph.len() {
        return Err(PertError::Other(anyhow!(
            "estimates cover {} activities but the graph has {}",
            estimates.len(),
            graph.len()
        )));
    }

    let order = graph.topological_order()?;
    let n = graph.len();

    let mut earliest_start = vec![0.0_f64; n];
    let mut earliest_finish = vec![0.0_f64; n];

    // Forward pass.
    for &idx in order.iter() {
        let start = graph
            .predecessor_indices(idx)
            .into_iter()
            .map(|p| earliest_finish[p.index()])
            .fold(0.0_f64, f64::max);
        earliest_start[idx.index()] = start;
        earliest_finish[idx.index()] = start + estimates.at(idx).expected;
    }

    let project_duration = order
        .iter()
        .filter(|&&idx| graph.successor_indices(idx).is_empty())
        .map(|idx| earliest_finish[idx.index()])
        .fold(0.0_f64, f64::max);

    let mut latest_start = vec![0.0_f64; n];
    let mut latest_finish = vec![0.0_f64; n];

    // Backward pass.
    for &idx in order.iter().rev() {
        let finish = graph
            .successor_indices(idx)
            .into_iter()
            .map(|s| latest_start[s.index()])
            .fold(project_duration, f64::min);
        latest_finish[idx.index()] = finish;
        latest_start[idx.index()] = finish - estimates.at(idx).expected;
    }

    let entries = graph
        .activities()
        .zip(estimates.iter())
        .enumerate()
        .map(|(i, (activity, estimate))| ScheduleEntry {
            activity: activity.id.clone(),
            duration: estimate.expected,
            earliest_start: earliest_start[i],
            earliest_finish: earliest_finish[i],
            latest_start: latest_start[i],
            latest_finish: latest_finish[i],
        })
        .collect();

    debug!(project_duration, activities = n, "forward/backward pass complete");

    Ok(Schedule::from_parts(entries, order, project_duration))
}
