// src/config/mod.rs

//! Project file loading and validation for pertdag.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a project from disk as TOML or CSV (`loader.rs`).
//! - Validate the `[analysis]` section and build the activity DAG (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_csv, parse_toml};
pub use model::{ActivityRecord, AnalysisSection, ProjectFile, RawProjectFile};
pub use validate::validate_analysis;
