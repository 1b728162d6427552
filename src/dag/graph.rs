// src/dag/graph.rs

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::dag::activity::Activity;
use crate::errors::{PertError, Result};

/// Immutable activity DAG.
///
/// Node indices follow input order, so "input order" and "index order" are
/// the same thing everywhere in the engine. Edges run predecessor →
/// successor. Only `dag::build` constructs one, after validating estimates,
/// references and acyclicity.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    graph: DiGraph<Activity, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ProjectGraph {
    pub(crate) fn new_unchecked(
        graph: DiGraph<Activity, ()>,
        index: HashMap<String, NodeIndex>,
    ) -> Self {
        Self { graph, index }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All activities in input order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &Activity {
        &self.graph[idx]
    }

    /// Immediate predecessors of an activity, as declared.
    pub fn predecessors_of(&self, id: &str) -> &[String] {
        self.activity(id)
            .map(|a| a.predecessors.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate successors of an activity, in input order.
    pub fn successors_of(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self
                .successor_indices(idx)
                .into_iter()
                .map(|s| self.graph[s].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn predecessor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    pub(crate) fn successor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    fn sorted_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        // petgraph yields neighbours newest-edge-first.
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort_unstable();
        out
    }

    /// Activities with no predecessors, in input order.
    pub fn sources(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_directed(idx, Direction::Incoming).next().is_none())
            .map(|idx| self.graph[idx].id.as_str())
            .collect()
    }

    /// Activities with no successors, in input order.
    pub fn sinks(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_directed(idx, Direction::Outgoing).next().is_none())
            .map(|idx| self.graph[idx].id.as_str())
            .collect()
    }

    /// Every `(predecessor, successor)` edge, grouped by successor in input order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                )
            })
            .collect()
    }

    /// Deterministic topological order.
    ///
    /// Kahn's algorithm with a min-heap on input position: among activities
    /// whose predecessors are all placed, the earliest-declared one goes
    /// next. Fails with `CycleDetected` listing whatever could not be placed.
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>> {
        let n = self.graph.node_count();
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for succ in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let deg = &mut in_degree[succ.index()];
                *deg -= 1;
                if *deg == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if order.len() != n {
            let members = self
                .graph
                .node_indices()
                .filter(|idx| in_degree[idx.index()] > 0)
                .map(|idx| self.graph[idx].id.clone())
                .collect();
            return Err(PertError::CycleDetected { members });
        }

        Ok(order)
    }
}
