// src/config/loader.rs

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::model::{ActivityRecord, AnalysisSection, ProjectFile, RawProjectFile};
use crate::errors::{PertError, Result};
use crate::types::InputFormat;

/// How to read a project file from disk.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Force a format; `None` picks one from the file extension.
    pub format: Option<InputFormat>,
    /// Field delimiter for CSV input.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: b';',
        }
    }
}

/// Load a project file from a given path and return the raw `RawProjectFile`.
///
/// This only performs deserialization; it does **not** validate estimates,
/// predecessor references or acyclicity. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<RawProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let format = opts.format.unwrap_or_else(|| InputFormat::from_path(path));
    debug!(path = %path.display(), ?format, "loading project file");

    match format {
        InputFormat::Toml => parse_toml(&contents),
        InputFormat::Csv => parse_csv(&contents, opts.delimiter),
    }
}

/// Load a project file from path and run full validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML or CSV.
/// - Applies `[analysis]` defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - malformed `[analysis]` values,
///   - invalid three-point estimates,
///   - duplicate ids and unknown predecessors,
///   - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<ProjectFile> {
    let raw = load_from_path(&path, opts)?;
    ProjectFile::try_from(raw)
}

/// Parse a TOML project document.
pub fn parse_toml(contents: &str) -> Result<RawProjectFile> {
    let raw: RawProjectFile = toml::from_str(contents)?;
    Ok(raw)
}

/// One spreadsheet row. Numbers stay text until [`parse_number`] so that
/// decimal commas survive.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Nodos")]
    id: String,
    #[serde(default, alias = "Actividades")]
    description: String,
    optimistic: String,
    most_likely: String,
    pessimistic: String,
    #[serde(default, alias = "Predecesor")]
    predecessors: String,
}

/// Parse a delimited spreadsheet export.
///
/// Expected header: `id;description;optimistic;most_likely;pessimistic;predecessors`.
/// Extra columns (for example precomputed schedule columns) are ignored.
/// Analysis options cannot be expressed in CSV, so defaults apply.
pub fn parse_csv(contents: &str, delimiter: u8) -> Result<RawProjectFile> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut activity = Vec::new();
    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = idx + 2;

        activity.push(ActivityRecord {
            optimistic: parse_number(&row.optimistic, line, "optimistic")?,
            most_likely: parse_number(&row.most_likely, line, "most_likely")?,
            pessimistic: parse_number(&row.pessimistic, line, "pessimistic")?,
            predecessors: split_predecessors(&row.predecessors),
            description: row.description,
            id: row.id,
        });
    }

    debug!(activities = activity.len(), "parsed CSV project");

    Ok(RawProjectFile {
        analysis: AnalysisSection::default(),
        activity,
    })
}

fn parse_number(field: &str, line: usize, column: &str) -> Result<f64> {
    let normalised = field.trim().replace(',', ".");
    normalised.parse::<f64>().map_err(|_| {
        PertError::ConfigError(format!(
            "line {line}: column `{column}` is not a number: '{field}'"
        ))
    })
}

/// `"-"` and `""` mean "no predecessors"; otherwise a comma-separated list.
fn split_predecessors(field: &str) -> Vec<String> {
    let field = field.trim();
    if field.is_empty() || field == "-" {
        return Vec::new();
    }
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_accepts_decimal_commas_and_dash_for_no_predecessors() {
        let csv = "id;description;optimistic;most_likely;pessimistic;predecessors\n\
                   A;Design;1;2,5;4;-\n\
                   B;Build;2;3;4;A\n\
                   C;Ship;1;1;1;A, B\n";

        let raw = parse_csv(csv, b';').unwrap();
        assert_eq!(raw.activity.len(), 3);
        assert_eq!(raw.activity[0].most_likely, 2.5);
        assert!(raw.activity[0].predecessors.is_empty());
        assert_eq!(raw.activity[2].predecessors, vec!["A", "B"]);
    }

    #[test]
    fn csv_accepts_spreadsheet_header_aliases() {
        let csv = "Nodos;Actividades;optimistic;most_likely;pessimistic;Predecesor;TIC\n\
                   A;Design;1;2;3;-;0\n";

        let raw = parse_csv(csv, b';').unwrap();
        assert_eq!(raw.activity[0].id, "A");
        assert_eq!(raw.activity[0].description, "Design");
    }

    #[test]
    fn csv_reports_line_of_bad_number() {
        let csv = "id;optimistic;most_likely;pessimistic\nA;1;two;3\n";

        match parse_csv(csv, b';') {
            Err(PertError::ConfigError(msg)) => {
                assert!(msg.contains("line 2"));
                assert!(msg.contains("most_likely"));
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn toml_keeps_activity_order_and_defaults() {
        let raw = parse_toml(
            r#"
[[activity]]
id = "Z"
optimistic = 1
most_likely = 2
pessimistic = 3

[[activity]]
id = "A"
optimistic = 1.0
most_likely = 1.0
pessimistic = 1.0
predecessors = ["Z"]
"#,
        )
        .unwrap();

        let ids: Vec<_> = raw.activity.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "A"]);
        assert_eq!(raw.analysis.epsilon, 1e-9);
        assert_eq!(raw.analysis.max_paths, 64);
    }
}
