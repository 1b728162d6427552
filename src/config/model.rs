// src/config/model.rs

use serde::Deserialize;

use crate::dag::ProjectGraph;
use crate::types::{ActivityId, PathSelection};

/// Top-level project file as read from TOML, before validation.
///
/// ```toml
/// [analysis]
/// epsilon = 1e-9
/// targets = [70.0]
/// ranges = [[62.0, 68.0]]
///
/// [[activity]]
/// id = "A"
/// description = "Concept and game design document"
/// optimistic = 3.0
/// most_likely = 4.0
/// pessimistic = 5.0
///
/// [[activity]]
/// id = "B"
/// optimistic = 4.0
/// most_likely = 6.0
/// pessimistic = 8.0
/// predecessors = ["A"]
/// ```
///
/// Activities are an array of tables so that input order survives parsing;
/// it drives every deterministic tie-break downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectFile {
    /// Engine options and probability queries from `[analysis]`.
    #[serde(default)]
    pub analysis: AnalysisSection,

    /// All activities from `[[activity]]`, in file order.
    #[serde(default)]
    pub activity: Vec<ActivityRecord>,
}

/// Validated project: checked `[analysis]` section plus the built DAG.
///
/// Only constructible through `TryFrom<RawProjectFile>` (see
/// `config::validate`) or [`ProjectFile::new_unchecked`].
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub analysis: AnalysisSection,
    pub graph: ProjectGraph,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(analysis: AnalysisSection, graph: ProjectGraph) -> Self {
        Self { analysis, graph }
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSection {
    /// Relative tolerance for slack against zero, scaled by the project duration.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// `"all"` or `"first"`.
    #[serde(default)]
    pub path_selection: PathSelection,

    /// Upper bound on the number of critical paths reported.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    /// Target durations for `P(T <= x)` queries.
    #[serde(default)]
    pub targets: Vec<f64>,

    /// `[low, high]` pairs for `P(low < T < high)` queries.
    #[serde(default)]
    pub ranges: Vec<[f64; 2]>,

    /// Probabilities for "duration met with probability p" queries.
    #[serde(default)]
    pub confidence: Vec<f64>,
}

fn default_epsilon() -> f64 {
    1e-9
}

fn default_max_paths() -> usize {
    64
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            path_selection: PathSelection::default(),
            max_paths: default_max_paths(),
            targets: Vec::new(),
            ranges: Vec::new(),
            confidence: Vec::new(),
        }
    }
}

/// One raw activity row, as supplied by the caller.
///
/// Nothing is checked here; `dag::build` validates estimates and
/// predecessor references.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,

    /// Free text, carried through for reports only.
    #[serde(default)]
    pub description: String,

    /// Optimistic duration `a`.
    pub optimistic: f64,

    /// Most likely duration `m`.
    pub most_likely: f64,

    /// Pessimistic duration `b`.
    pub pessimistic: f64,

    /// Ids of activities that must finish before this one starts.
    #[serde(default)]
    pub predecessors: Vec<ActivityId>,
}

impl ActivityRecord {
    pub fn new(
        id: impl Into<ActivityId>,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    ) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            optimistic,
            most_likely,
            pessimistic,
            predecessors: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn after(mut self, predecessor: impl Into<ActivityId>) -> Self {
        self.predecessors.push(predecessor.into());
        self
    }
}
