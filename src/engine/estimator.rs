// src/engine/estimator.rs

//! PERT three-point estimation.
//!
//! Durations are modelled with the usual beta-distribution approximation:
//!
//! - expected duration `te = (a + 4m + b) / 6`
//! - variance `v = ((b - a) / 6)^2`

use petgraph::graph::NodeIndex;

use crate::dag::{Activity, ProjectGraph};

/// Expected duration and variance of one activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub expected: f64,
    pub variance: f64,
}

impl Estimate {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Estimate a single activity.
pub fn estimate(activity: &Activity) -> Estimate {
    let (a, m, b) = activity.estimates();
    estimate_triple(a, m, b)
}

/// Estimate from a raw `(a, m, b)` triple with `a <= m <= b`.
///
/// `te` is clamped into `[a, b]`: the weighted mean always lies there, but the
/// rounded sum can land one ulp outside when all three values are equal.
pub fn estimate_triple(a: f64, m: f64, b: f64) -> Estimate {
    let raw = (a + 4.0 * m + b) / 6.0;
    let expected = if a <= b { raw.clamp(a, b) } else { raw };
    let spread = (b - a) / 6.0;
    Estimate {
        expected,
        variance: spread * spread,
    }
}

/// Per-activity estimates for a whole graph, indexed like the graph's nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimates {
    values: Vec<Estimate>,
}

impl Estimates {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn at(&self, idx: NodeIndex) -> Estimate {
        self.values[idx.index()]
    }

    /// Estimate for the given activity id.
    pub fn of(&self, graph: &ProjectGraph, id: &str) -> Option<Estimate> {
        let idx = graph.index_of(id)?;
        self.values.get(idx.index()).copied()
    }

    /// Estimates in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Estimate> {
        self.values.iter()
    }
}

/// Estimate every activity of the graph.
pub fn estimate_all(graph: &ProjectGraph) -> Estimates {
    Estimates {
        values: graph.activities().map(estimate).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_triple_has_mode_as_mean() {
        let est = estimate_triple(1.0, 2.0, 3.0);
        assert_eq!(est.expected, 2.0);
        assert!((est.variance - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn skewed_triple_matches_formula() {
        // (6 + 32 + 11) / 6, ((11 - 6) / 6)^2
        let est = estimate_triple(6.0, 8.0, 11.0);
        assert!((est.expected - 49.0 / 6.0).abs() < 1e-12);
        assert!((est.variance - 25.0 / 36.0).abs() < 1e-12);
        assert!((est.std_dev() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn point_estimate_has_zero_variance() {
        let est = estimate_triple(0.1, 0.1, 0.1);
        assert_eq!(est.expected, 0.1);
        assert_eq!(est.variance, 0.0);
    }
}
