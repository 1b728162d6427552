// src/engine/critical.rs

//! Slack, critical membership and critical path extraction.

use std::collections::HashMap;

use anyhow::anyhow;
use petgraph::graph::NodeIndex;
use tracing::{debug, warn};

use crate::config::model::AnalysisSection;
use crate::dag::ProjectGraph;
use crate::engine::estimator::Estimates;
use crate::engine::probability::ProjectDistribution;
use crate::engine::scheduler::Schedule;
use crate::errors::{PertError, Result};
use crate::types::{ActivityId, PathSelection};

/// Knobs for the analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Relative tolerance: slack within `epsilon * max(project duration, 1)`
    /// of zero counts as zero.
    pub epsilon: f64,
    pub path_selection: PathSelection,
    /// Upper bound on reported paths under `PathSelection::All`.
    pub max_paths: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from(&AnalysisSection::default())
    }
}

impl From<&AnalysisSection> for AnalysisOptions {
    fn from(section: &AnalysisSection) -> Self {
        Self {
            epsilon: section.epsilon,
            path_selection: section.path_selection,
            max_paths: section.max_paths,
        }
    }
}

/// Float figures for one activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityFloat {
    /// Total float, `TIL - TIC`, snapped to exactly 0 within epsilon.
    pub total: f64,
    /// Delay absorbable without moving any successor's earliest start.
    pub free: f64,
    pub critical: bool,
    /// The activity's variance if it is critical, otherwise 0.
    pub critical_variance: f64,
}

/// One zero-slack chain from a source to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    pub activities: Vec<ActivityId>,
    /// Sum of expected durations along the path.
    pub expected_duration: f64,
    /// Sum of variances along the path.
    pub variance: f64,
}

impl CriticalPath {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn distribution(&self) -> ProjectDistribution {
        ProjectDistribution::new(self.expected_duration, self.variance)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.activities.iter().any(|a| a == id)
    }
}

/// Everything a consumer needs to highlight the critical part of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPathResult {
    ids: Vec<ActivityId>,
    positions: HashMap<ActivityId, usize>,
    floats: Vec<ActivityFloat>,
    critical_edges: Vec<(ActivityId, ActivityId)>,
    paths: Vec<CriticalPath>,
    truncated: bool,
}

impl CriticalPathResult {
    pub fn float_of(&self, id: &str) -> Option<&ActivityFloat> {
        self.positions.get(id).map(|&pos| &self.floats[pos])
    }

    /// `(id, float)` pairs in input order.
    pub fn floats(&self) -> impl Iterator<Item = (&str, &ActivityFloat)> {
        self.ids.iter().map(String::as_str).zip(self.floats.iter())
    }

    /// Node highlight predicate.
    pub fn is_critical(&self, id: &str) -> bool {
        self.float_of(id).is_some_and(|f| f.critical)
    }

    /// Critical activities in input order.
    pub fn critical_activities(&self) -> Vec<&str> {
        self.floats()
            .filter(|(_, f)| f.critical)
            .map(|(id, _)| id)
            .collect()
    }

    /// Edge highlight predicate: both ends critical and the edge is tight.
    pub fn is_critical_edge(&self, from: &str, to: &str) -> bool {
        self.critical_edges
            .iter()
            .any(|(p, s)| p == from && s == to)
    }

    pub fn critical_edges(&self) -> &[(ActivityId, ActivityId)] {
        &self.critical_edges
    }

    /// Reported paths in enumeration order.
    pub fn paths(&self) -> &[CriticalPath] {
        &self.paths
    }

    /// Whether `max_paths` cut the enumeration short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The path probability queries are evaluated against: the reported path
    /// with the largest variance, earliest in enumeration order on ties.
    pub fn primary_path(&self) -> Option<&CriticalPath> {
        self.paths.iter().fold(None, |best: Option<&CriticalPath>, path| match best {
            Some(b) if b.variance >= path.variance => Some(b),
            _ => Some(path),
        })
    }

    pub fn project_distribution(&self) -> Option<ProjectDistribution> {
        self.primary_path().map(CriticalPath::distribution)
    }
}

/// Derive slack and critical paths from a finished schedule.
pub fn analyze(
    graph: &ProjectGraph,
    estimates: &Estimates,
    schedule: &Schedule,
    options: &AnalysisOptions,
) -> Result<CriticalPathResult> {
    if schedule.entries().len() != graph.len() || estimates.len() != graph.len() {
        return Err(PertError::Other(anyhow!(
            "schedule/estimates do not match a graph of {} activities",
            graph.len()
        )));
    }

    let project_duration = schedule.project_duration();
    // Rounding in the passes grows with the magnitude of the times involved.
    let eps = options.epsilon * project_duration.abs().max(1.0);

    let mut floats = Vec::with_capacity(graph.len());
    for idx in (0..graph.len()).map(NodeIndex::new) {
        let entry = schedule.at(idx);

        let raw = entry.slack();
        if raw < -eps {
            return Err(PertError::InconsistentSchedule {
                activity: entry.activity.clone(),
                slack: raw,
            });
        }
        let total = snap(raw, eps);
        let critical = total == 0.0;

        let free = graph
            .successor_indices(idx)
            .into_iter()
            .map(|s| schedule.at(s).earliest_start)
            .fold(project_duration, f64::min)
            - entry.earliest_finish;

        floats.push(ActivityFloat {
            total,
            free: snap(free, eps),
            critical,
            critical_variance: if critical { estimates.at(idx).variance } else { 0.0 },
        });
    }

    let tight = |from: NodeIndex, to: NodeIndex| {
        floats[from.index()].critical
            && floats[to.index()].critical
            && (schedule.at(to).earliest_start - schedule.at(from).earliest_finish).abs() <= eps
    };

    let mut critical_edges = Vec::new();
    for to in (0..graph.len()).map(NodeIndex::new) {
        for from in graph.predecessor_indices(to) {
            if tight(from, to) {
                critical_edges.push((graph.node(from).id.clone(), graph.node(to).id.clone()));
            }
        }
    }

    let limit = match options.path_selection {
        PathSelection::All => options.max_paths,
        PathSelection::First => 1,
    };

    let mut walker = PathWalker {
        graph,
        tight: &tight,
        limit: limit.saturating_add(1),
        found: Vec::new(),
    };
    for idx in (0..graph.len()).map(NodeIndex::new) {
        if floats[idx.index()].critical && graph.predecessor_indices(idx).is_empty() {
            walker.walk(idx);
        }
    }
    let mut raw_paths = walker.found;

    let truncated = raw_paths.len() > limit;
    raw_paths.truncate(limit);
    if truncated && options.path_selection == PathSelection::All {
        warn!(
            max_paths = options.max_paths,
            "more critical paths exist than max_paths; report is truncated"
        );
    }

    let paths: Vec<CriticalPath> = raw_paths
        .into_iter()
        .map(|nodes| {
            let (expected_duration, variance) =
                nodes.iter().fold((0.0, 0.0), |(mean, var), &idx| {
                    let est = estimates.at(idx);
                    (mean + est.expected, var + est.variance)
                });
            CriticalPath {
                activities: nodes.iter().map(|&idx| graph.node(idx).id.clone()).collect(),
                expected_duration,
                variance,
            }
        })
        .collect();

    if paths.is_empty() {
        return Err(PertError::NoCriticalPath { project_duration });
    }

    debug!(
        critical = floats.iter().filter(|f| f.critical).count(),
        paths = paths.len(),
        "critical path analysis complete"
    );

    let ids: Vec<ActivityId> = graph.activities().map(|a| a.id.clone()).collect();
    let positions = ids
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.clone(), pos))
        .collect();

    Ok(CriticalPathResult {
        ids,
        positions,
        floats,
        critical_edges,
        paths,
        truncated,
    })
}

fn snap(value: f64, eps: f64) -> f64 {
    if value.abs() <= eps { 0.0 } else { value }
}

/// Depth-first enumeration of tight critical chains ending at a sink.
///
/// Iterative so that path length is bounded by the heap, not the call stack.
struct PathWalker<'a, F> {
    graph: &'a ProjectGraph,
    tight: &'a F,
    limit: usize,
    found: Vec<Vec<NodeIndex>>,
}

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

impl<F> PathWalker<'_, F>
where
    F: Fn(NodeIndex, NodeIndex) -> bool,
{
    fn frame(&self, node: NodeIndex) -> Frame {
        Frame {
            node,
            successors: self.graph.successor_indices(node),
            next: 0,
        }
    }

    fn walk(&mut self, source: NodeIndex) {
        let mut path = vec![source];
        let mut frames = vec![self.frame(source)];

        while let Some(top) = frames.last_mut() {
            if self.found.len() >= self.limit {
                return;
            }

            if top.successors.is_empty() {
                self.found.push(path.clone());
                frames.pop();
                path.pop();
                continue;
            }

            let Some(&succ) = top.successors.get(top.next) else {
                frames.pop();
                path.pop();
                continue;
            };
            top.next += 1;
            let node = top.node;

            if (self.tight)(node, succ) {
                path.push(succ);
                let frame = self.frame(succ);
                frames.push(frame);
            }
        }
    }
}
