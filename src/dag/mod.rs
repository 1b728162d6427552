// src/dag/mod.rs

//! Activity DAG representation and construction.
//!
//! - [`activity`] holds validated per-activity data.
//! - [`builder`] validates raw records and builds the graph.
//! - [`graph`] is the immutable DAG with deterministic traversal helpers.

pub mod activity;
pub mod builder;
pub mod graph;

pub use activity::Activity;
pub use builder::build;
pub use graph::ProjectGraph;
