// src/config/validate.rs

use crate::config::model::{AnalysisSection, ProjectFile, RawProjectFile};
use crate::dag;
use crate::errors::{PertError, Result};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = crate::errors::PertError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_analysis(&raw.analysis)?;
        let graph = dag::build(&raw.activity)?;
        Ok(ProjectFile::new_unchecked(raw.analysis, graph))
    }
}

/// Check the `[analysis]` section for values the engine cannot use.
pub fn validate_analysis(analysis: &AnalysisSection) -> Result<()> {
    validate_engine_options(analysis)?;
    validate_queries(analysis)?;
    Ok(())
}

fn validate_engine_options(analysis: &AnalysisSection) -> Result<()> {
    // path_selection is strongly typed and validated during deserialization.

    if !analysis.epsilon.is_finite() || analysis.epsilon <= 0.0 {
        return Err(PertError::ConfigError(format!(
            "[analysis].epsilon must be a positive finite number (got {})",
            analysis.epsilon
        )));
    }

    if analysis.max_paths == 0 {
        return Err(PertError::ConfigError(
            "[analysis].max_paths must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_queries(analysis: &AnalysisSection) -> Result<()> {
    for target in analysis.targets.iter() {
        if !target.is_finite() {
            return Err(PertError::ConfigError(format!(
                "[analysis].targets contains a non-finite value ({target})"
            )));
        }
    }

    for [low, high] in analysis.ranges.iter() {
        if !low.is_finite() || !high.is_finite() {
            return Err(PertError::ConfigError(format!(
                "[analysis].ranges contains a non-finite bound ([{low}, {high}])"
            )));
        }
        if high <= low {
            return Err(PertError::ConfigError(format!(
                "[analysis].ranges entry [{low}, {high}] must have high > low"
            )));
        }
    }

    for p in analysis.confidence.iter() {
        if !(*p > 0.0 && *p < 1.0) {
            return Err(PertError::ConfigError(format!(
                "[analysis].confidence values must lie strictly between 0 and 1 (got {p})"
            )));
        }
    }

    Ok(())
}
