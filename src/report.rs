// src/report.rs

//! Plain-text rendering of an analysis for the CLI.
//!
//! Nothing here computes schedule semantics; it only formats what
//! `engine` produced and evaluates the configured probability queries.

use std::fmt;

use tracing::warn;

use crate::config::model::{AnalysisSection, ProjectFile};
use crate::engine::{ProjectAnalysis, ProjectDistribution};
use crate::errors::Result;

/// A probability question about the project's completion time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// `P(T <= target)`
    By(f64),
    /// `P(low < T < high)`
    Between(f64, f64),
    /// Duration met with the given probability.
    Confidence(f64),
}

/// Numeric answer to a [`Query`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Answer {
    /// Probability for `By`/`Between`, duration for `Confidence`.
    pub value: f64,
    /// Z-score of the target (upper bound for `Between`).
    pub z: f64,
    /// Z-score of the lower bound, `Between` only.
    pub z_low: Option<f64>,
}

#[derive(Debug)]
pub struct QueryAnswer {
    pub query: Query,
    pub result: Result<Answer>,
}

/// All queries from the `[analysis]` section, in declaration order.
pub fn queries_from(section: &AnalysisSection) -> Vec<Query> {
    let by = section.targets.iter().map(|&t| Query::By(t));
    let between = section.ranges.iter().map(|&[low, high]| Query::Between(low, high));
    let confidence = section.confidence.iter().map(|&p| Query::Confidence(p));
    by.chain(between).chain(confidence).collect()
}

pub fn evaluate(query: Query, dist: &ProjectDistribution) -> Result<Answer> {
    match query {
        Query::By(target) => Ok(Answer {
            value: dist.probability_by(target)?,
            z: dist.z_score(target)?,
            z_low: None,
        }),
        Query::Between(low, high) => Ok(Answer {
            value: dist.probability_between(low, high)?,
            z: dist.z_score(high)?,
            z_low: Some(dist.z_score(low)?),
        }),
        Query::Confidence(p) => {
            let duration = dist.duration_at_confidence(p)?;
            Ok(Answer {
                value: duration,
                z: dist.z_score(duration)?,
                z_low: None,
            })
        }
    }
}

/// Evaluate every query; failures are kept per query and logged, never fatal.
pub fn answer_queries(queries: &[Query], dist: Option<&ProjectDistribution>) -> Vec<QueryAnswer> {
    let Some(dist) = dist else {
        return Vec::new();
    };

    queries
        .iter()
        .map(|&query| {
            let result = evaluate(query, dist);
            if let Err(ref e) = result {
                warn!(?query, error = %e, "probability query failed");
            }
            QueryAnswer { query, result }
        })
        .collect()
}

/// Full report: table, slack summary, critical paths and query answers.
pub struct Report<'a> {
    project: &'a ProjectFile,
    analysis: &'a ProjectAnalysis,
    answers: Vec<QueryAnswer>,
}

impl<'a> Report<'a> {
    pub fn new(project: &'a ProjectFile, analysis: &'a ProjectAnalysis) -> Self {
        let queries = queries_from(&project.analysis);
        let dist = analysis.distribution();
        let answers = answer_queries(&queries, dist.as_ref());
        Self {
            project,
            analysis,
            answers,
        }
    }

    pub fn answers(&self) -> &[QueryAnswer] {
        &self.answers
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = &self.project.graph;
        let analysis = self.analysis;
        let critical = &analysis.critical;

        writeln!(
            f,
            "pertdag report: {} activities, {} edges",
            graph.len(),
            graph.edges().len()
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<8} {:>8} {:>8} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}  {:<12} {}",
            "id", "a", "m", "b", "te", "var", "TIC", "TFC", "TIL", "TFL", "slack", "free", "crit.var",
            "after", "description"
        )?;

        for ((activity, estimate), entry) in graph
            .activities()
            .zip(analysis.estimates.iter())
            .zip(analysis.schedule.entries())
        {
            let Some(float) = critical.float_of(&activity.id) else {
                continue;
            };
            let marker = if float.critical { "*" } else { " " };
            let after = if activity.predecessors.is_empty() {
                "-".to_string()
            } else {
                activity.predecessors.join(",")
            };

            writeln!(
                f,
                "{:<8} {:>8.2} {:>8.2} {:>8.2} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4}{} {:<12} {}",
                activity.id,
                activity.optimistic,
                activity.most_likely,
                activity.pessimistic,
                estimate.expected,
                estimate.variance,
                entry.earliest_start,
                entry.earliest_finish,
                entry.latest_start,
                entry.latest_finish,
                float.total,
                float.free,
                float.critical_variance,
                marker,
                after,
                activity.description,
            )?;
        }
        writeln!(f)?;

        writeln!(f, "project duration: {:.4}", analysis.project_duration())?;

        let slack: Vec<String> = critical
            .floats()
            .filter(|(_, fl)| !fl.critical)
            .map(|(id, fl)| format!("{id} = {:.4}", fl.total))
            .collect();
        if slack.is_empty() {
            writeln!(f, "activities with slack: none")?;
        } else {
            writeln!(f, "activities with slack: {}", slack.join(", "))?;
        }
        writeln!(f)?;

        for (i, path) in critical.paths().iter().enumerate() {
            writeln!(
                f,
                "critical path {}: {}  (mean {:.4}, variance {:.4}, std dev {:.4})",
                i + 1,
                path.activities.join(" -> "),
                path.expected_duration,
                path.variance,
                path.std_dev()
            )?;
        }
        if critical.is_truncated() {
            writeln!(f, "  (more critical paths exist; raise [analysis].max_paths)")?;
        }

        let edges: Vec<String> = critical
            .critical_edges()
            .iter()
            .map(|(from, to)| format!("{from}->{to}"))
            .collect();
        writeln!(f, "critical edges: {}", edges.join(", "))?;

        if self.answers.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        if let Some(dist) = analysis.distribution() {
            writeln!(
                f,
                "completion probabilities (mean {:.4}, std dev {:.4}):",
                dist.mean,
                dist.std_dev()
            )?;
        }
        for answer in self.answers.iter() {
            write!(f, "  ")?;
            match (answer.query, &answer.result) {
                (Query::By(t), Ok(a)) => {
                    writeln!(f, "P(T <= {t}) = {:.4}  (Z = {:.2})", a.value, a.z)?
                }
                (Query::Between(low, high), Ok(a)) => writeln!(
                    f,
                    "P({low} < T < {high}) = {:.4}  (Z = {:.2} .. {:.2})",
                    a.value,
                    a.z_low.unwrap_or(f64::NAN),
                    a.z
                )?,
                (Query::Confidence(p), Ok(a)) => {
                    writeln!(f, "T at P = {p}: {:.4}  (Z = {:.2})", a.value, a.z)?
                }
                (query, Err(e)) => writeln!(f, "{query:?}: {e}")?,
            }
        }

        Ok(())
    }
}

/// Validation-only view used by `--dry-run`.
pub struct DryRun<'a> {
    project: &'a ProjectFile,
}

impl<'a> DryRun<'a> {
    pub fn new(project: &'a ProjectFile) -> Self {
        Self { project }
    }
}

impl fmt::Display for DryRun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = &self.project.graph;
        let analysis = &self.project.analysis;

        writeln!(f, "pertdag dry-run")?;
        writeln!(f, "  analysis.epsilon = {:e}", analysis.epsilon)?;
        writeln!(f, "  analysis.path_selection = {:?}", analysis.path_selection)?;
        writeln!(f, "  analysis.max_paths = {}", analysis.max_paths)?;
        writeln!(f)?;

        writeln!(f, "activities ({}):", graph.len())?;
        for activity in graph.activities() {
            writeln!(f, "  - {}", activity.id)?;
            if !activity.description.is_empty() {
                writeln!(f, "      description: {}", activity.description)?;
            }
            writeln!(
                f,
                "      estimates: a={} m={} b={}",
                activity.optimistic, activity.most_likely, activity.pessimistic
            )?;
            if !activity.predecessors.is_empty() {
                writeln!(f, "      after: {:?}", activity.predecessors)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "sources: {:?}", graph.sources())?;
        writeln!(f, "sinks: {:?}", graph.sinks())?;

        Ok(())
    }
}
