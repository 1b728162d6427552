// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::{InputFormat, PathSelection};

/// Command-line arguments for `pertdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pertdag",
    version,
    about = "CPM/PERT schedule, critical path and completion probabilities for an activity DAG.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML or CSV).
    ///
    /// Default: `Pertdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Pertdag.toml")]
    pub project: String,

    /// Force the input format instead of guessing from the extension.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Field delimiter for CSV input.
    #[arg(long, value_name = "CHAR", default_value_t = ';')]
    pub delimiter: char,

    /// Report P(T <= DURATION). May be repeated.
    #[arg(long = "target", value_name = "DURATION", allow_negative_numbers = true)]
    pub targets: Vec<f64>,

    /// Report P(LOW < T < HIGH). May be repeated.
    #[arg(long = "range", value_name = "LOW:HIGH", value_parser = parse_range)]
    pub ranges: Vec<(f64, f64)>,

    /// Report the duration met with probability P. May be repeated.
    #[arg(long = "confidence", value_name = "P")]
    pub confidence: Vec<f64>,

    /// Override `[analysis].path_selection` (`all` or `first`).
    #[arg(long, value_name = "MODE")]
    pub path_selection: Option<PathSelection>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PERTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the activity graph, but don't schedule.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level name in `EnvFilter` syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Parse `LOW:HIGH` into a pair. Ordering is checked later with the rest of
/// the `[analysis]` queries.
fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (low, high) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LOW:HIGH, got '{s}'"))?;
    let low = low
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid range start '{low}': {e}"))?;
    let high = high
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid range end '{high}': {e}"))?;
    Ok((low, high))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
