#![allow(dead_code)]

use pertdag::config::{ActivityRecord, AnalysisSection, ProjectFile, RawProjectFile};
use pertdag::dag::ProjectGraph;
use pertdag::types::PathSelection;

/// Builder for `ProjectFile` to simplify test setup.
pub struct ProjectBuilder {
    project: RawProjectFile,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            project: RawProjectFile {
                analysis: AnalysisSection::default(),
                activity: Vec::new(),
            },
        }
    }

    pub fn with_activity(mut self, activity: ActivityRecord) -> Self {
        self.project.activity.push(activity);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.project.analysis.epsilon = epsilon;
        self
    }

    pub fn with_path_selection(mut self, selection: PathSelection) -> Self {
        self.project.analysis.path_selection = selection;
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.project.analysis.targets.push(target);
        self
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.project.analysis.ranges.push([low, high]);
        self
    }

    /// Raw records, for tests that expect validation to fail.
    pub fn records(&self) -> &[ActivityRecord] {
        &self.project.activity
    }

    pub fn build_raw(self) -> RawProjectFile {
        self.project
    }

    pub fn build(self) -> ProjectFile {
        ProjectFile::try_from(self.project).expect("Failed to build valid project from builder")
    }

    pub fn build_graph(self) -> ProjectGraph {
        self.build().graph
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ActivityRecord`.
pub struct ActivityBuilder {
    activity: ActivityRecord,
}

impl ActivityBuilder {
    /// Activity with a point estimate `a = m = b = duration`.
    pub fn fixed(id: &str, duration: f64) -> Self {
        Self::pert(id, duration, duration, duration)
    }

    pub fn pert(id: &str, optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            activity: ActivityRecord::new(id, optimistic, most_likely, pessimistic),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.activity.predecessors.push(dep.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.activity.description = text.to_string();
        self
    }

    pub fn build(self) -> ActivityRecord {
        self.activity
    }
}
