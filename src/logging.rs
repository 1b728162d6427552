// src/logging.rs

//! Logging setup for `pertdag` using `tracing` + `tracing-subscriber`.
//!
//! The filter is taken from, in order:
//! 1. the `--log-level` flag,
//! 2. the `PERTDAG_LOG` environment variable, in `EnvFilter` syntax
//!    (`debug`, `pertdag::engine=trace,info`, ...),
//! 3. `info`.
//!
//! Output goes to stderr; stdout carries only the report.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

const ENV_VAR: &str = "PERTDAG_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(ENV_VAR).ok();

    fmt()
        .with_env_filter(filter_for(cli_level, env.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn filter_for(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_str());
    }
    env.and_then(|directives| EnvFilter::try_new(directives.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same(a: EnvFilter, b: &str) -> bool {
        a.to_string() == EnvFilter::new(b).to_string()
    }

    #[test]
    fn flag_wins_over_env() {
        assert!(same(filter_for(Some(LogLevel::Warn), Some("trace")), "warn"));
    }

    #[test]
    fn env_accepts_directives() {
        assert!(same(filter_for(None, Some(" pertdag=debug ")), "pertdag=debug"));
    }

    #[test]
    fn defaults_to_info() {
        assert!(same(filter_for(None, None), "info"));
        assert!(same(filter_for(None, Some("pertdag=loudest")), "info"));
    }
}
