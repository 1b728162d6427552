// src/dag/builder.rs

//! Turns raw activity records into a validated [`ProjectGraph`].
//!
//! Validation is all-or-nothing: the first problem found aborts the build
//! and no partial graph is ever returned. Checks run in this order:
//!
//! 1. the record set is non-empty,
//! 2. ids are non-empty and unique, estimates are finite, positive and ordered,
//! 3. every predecessor names a known activity,
//! 4. the predecessor relation is acyclic (three-colour DFS).

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::config::model::ActivityRecord;
use crate::dag::activity::Activity;
use crate::dag::graph::ProjectGraph;
use crate::errors::{PertError, Result};
use crate::types::ActivityId;

/// Build the activity DAG from records, preserving their order.
pub fn build(records: &[ActivityRecord]) -> Result<ProjectGraph> {
    if records.is_empty() {
        return Err(PertError::EmptyProject);
    }

    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(PertError::ConfigError(format!(
                "activity #{} has an empty id",
                pos + 1
            )));
        }
        if positions.insert(record.id.as_str(), pos).is_some() {
            return Err(PertError::DuplicateActivity(record.id.clone()));
        }
        validate_estimate(record)?;
    }

    let predecessor_lists = resolve_predecessors(records, &positions)?;

    // successors[p] lists successor positions in ascending input order.
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (pos, preds) in predecessor_lists.iter().enumerate() {
        for pred in preds.iter() {
            successors[positions[pred.as_str()]].push(pos);
        }
    }

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    if let Some(members) = find_cycle(&ids, &successors) {
        return Err(PertError::CycleDetected { members });
    }

    let mut graph: DiGraph<Activity, ()> = DiGraph::with_capacity(records.len(), 0);
    let mut index: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());

    for (record, preds) in records.iter().zip(predecessor_lists.iter()) {
        let idx = graph.add_node(Activity::from_record(record, preds.clone()));
        index.insert(record.id.clone(), idx);
    }

    // Edge direction: predecessor -> successor.
    for (record, preds) in records.iter().zip(predecessor_lists.iter()) {
        let to = index[&record.id];
        for pred in preds.iter() {
            graph.add_edge(index[pred], to, ());
        }
    }

    debug!(
        activities = graph.node_count(),
        edges = graph.edge_count(),
        "built activity graph"
    );

    Ok(ProjectGraph::new_unchecked(graph, index))
}

fn validate_estimate(record: &ActivityRecord) -> Result<()> {
    let (a, m, b) = (record.optimistic, record.most_likely, record.pessimistic);

    let reason = if !(a.is_finite() && m.is_finite() && b.is_finite()) {
        Some(format!("estimates must be finite (a={a}, m={m}, b={b})"))
    } else if a <= 0.0 {
        Some(format!("optimistic duration must be positive (a={a})"))
    } else if a > m {
        Some(format!("optimistic exceeds most likely (a={a} > m={m})"))
    } else if m > b {
        Some(format!("most likely exceeds pessimistic (m={m} > b={b})"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(PertError::InvalidEstimate {
            activity: record.id.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Check every reference and drop repeats inside a single list.
fn resolve_predecessors(
    records: &[ActivityRecord],
    positions: &HashMap<&str, usize>,
) -> Result<Vec<Vec<ActivityId>>> {
    let mut resolved = Vec::with_capacity(records.len());

    for record in records.iter() {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut preds = Vec::with_capacity(record.predecessors.len());

        for pred in record.predecessors.iter() {
            if !positions.contains_key(pred.as_str()) {
                return Err(PertError::UnknownPredecessor {
                    activity: record.id.clone(),
                    predecessor: pred.clone(),
                });
            }
            if seen.insert(pred.as_str()) {
                preds.push(pred.clone());
            } else {
                debug!(activity = %record.id, predecessor = %pred, "ignoring repeated predecessor");
            }
        }

        resolved.push(preds);
    }

    Ok(resolved)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Iterative three-colour DFS. Returns the first cycle found, listed from the
/// node the back edge points at, in traversal order.
fn find_cycle(ids: &[&str], successors: &[Vec<usize>]) -> Option<Vec<ActivityId>> {
    let mut marks = vec![Mark::Unvisited; ids.len()];

    for root in 0..ids.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // (node, position of the next successor to visit)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::InProgress;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&next) = successors[node].get(frame.1) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
                Mark::InProgress => {
                    let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                    return Some(
                        stack[start..]
                            .iter()
                            .map(|&(n, _)| ids[n].to_string())
                            .collect(),
                    );
                }
                Mark::Done => {}
            }
        }
    }

    None
}
