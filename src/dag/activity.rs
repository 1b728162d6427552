// src/dag/activity.rs

//! Validated activity data stored on graph nodes.

use crate::config::model::ActivityRecord;
use crate::types::ActivityId;

/// An activity that passed validation: `0 < optimistic <= most_likely <= pessimistic`,
/// and every predecessor exists in the same graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub description: String,
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
    /// Direct predecessors, in declaration order, without repeats.
    pub predecessors: Vec<ActivityId>,
}

impl Activity {
    pub(crate) fn from_record(record: &ActivityRecord, predecessors: Vec<ActivityId>) -> Self {
        Self {
            id: record.id.clone(),
            description: record.description.clone(),
            optimistic: record.optimistic,
            most_likely: record.most_likely,
            pessimistic: record.pessimistic,
            predecessors,
        }
    }

    /// `(a, m, b)` as a tuple.
    pub fn estimates(&self) -> (f64, f64, f64) {
        (self.optimistic, self.most_likely, self.pessimistic)
    }
}
