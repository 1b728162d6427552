// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod report;
pub mod types;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::LoadOptions;
use crate::config::model::AnalysisSection;
use crate::config::{load_and_validate, validate_analysis};
use crate::engine::{AnalysisOptions, analyze_project};
use crate::report::{DryRun, Report};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project loading + validation (TOML or CSV)
/// - merging CLI probability queries into `[analysis]`
/// - the estimate → schedule → critical path pipeline
/// - the plain-text report on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let opts = LoadOptions {
        format: args.format,
        delimiter: delimiter_byte(args.delimiter)?,
    };

    let mut project = load_and_validate(&args.project, &opts)?;
    merge_cli_queries(&mut project.analysis, &args);
    validate_analysis(&project.analysis)?;

    info!(
        project = %args.project,
        activities = project.graph.len(),
        "project loaded"
    );

    if args.dry_run {
        print!("{}", DryRun::new(&project));
        debug!("dry-run complete (no scheduling)");
        return Ok(());
    }

    let options = AnalysisOptions::from(&project.analysis);
    let analysis = analyze_project(&project.graph, &options)?;

    print!("{}", Report::new(&project, &analysis));
    Ok(())
}

/// CLI queries are appended after those from the project file; a CLI
/// path selection replaces the file's.
fn merge_cli_queries(analysis: &mut AnalysisSection, args: &CliArgs) {
    if let Some(selection) = args.path_selection {
        analysis.path_selection = selection;
    }
    analysis.targets.extend(args.targets.iter().copied());
    analysis
        .ranges
        .extend(args.ranges.iter().map(|&(low, high)| [low, high]));
    analysis.confidence.extend(args.confidence.iter().copied());
}

fn delimiter_byte(c: char) -> Result<u8> {
    if !c.is_ascii() {
        bail!("CSV delimiter must be a single ASCII character (got {c:?})");
    }
    Ok(c as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathSelection;
    use clap::Parser;

    #[test]
    fn cli_overrides_land_in_analysis_section() {
        let args = CliArgs::try_parse_from([
            "pertdag",
            "--path-selection",
            "first",
            "--target",
            "12",
            "--range",
            "1:2",
        ])
        .unwrap();
        let mut analysis = AnalysisSection {
            targets: vec![10.0],
            ..AnalysisSection::default()
        };

        merge_cli_queries(&mut analysis, &args);

        assert_eq!(analysis.path_selection, PathSelection::First);
        assert_eq!(analysis.targets, vec![10.0, 12.0]);
        assert_eq!(analysis.ranges, vec![[1.0, 2.0]]);
    }

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert!(delimiter_byte('§').is_err());
    }
}
