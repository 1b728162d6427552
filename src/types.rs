use std::str::FromStr;
use serde::Deserialize;

/// Canonical activity identifier type used throughout the engine.
pub type ActivityId = String;

/// Which critical paths to report when zero-slack ties produce several.
///
/// - `All`: every critical path, in enumeration order (default).
/// - `First`: only the first path found when walking sources and
///   successors in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSelection {
    All,
    First,
}

impl Default for PathSelection {
    fn default() -> Self {
        PathSelection::All
    }
}

impl FromStr for PathSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PathSelection::All),
            "first" => Ok(PathSelection::First),
            other => Err(format!(
                "invalid path_selection: {other} (expected \"all\" or \"first\")"
            )),
        }
    }
}

/// On-disk format of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// `[analysis]` section plus `[[activity]]` tables.
    Toml,
    /// Delimited spreadsheet export, one activity per row.
    Csv,
}

impl InputFormat {
    /// Guess the format from a file extension; anything but `.csv` is TOML.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Toml,
        }
    }
}
