// tests/videogame_fixture.rs
mod common;
use crate::common::{TOL, approx, demo_path, init_tracing};

use std::error::Error;

use pertdag::config::ProjectFile;
use pertdag::config::load_and_validate;
use pertdag::config::loader::LoadOptions;
use pertdag::engine::{AnalysisOptions, ProjectAnalysis, analyze_project};
use pertdag::report::Report;

type TestResult = Result<(), Box<dyn Error>>;

const CRITICAL: [&str; 9] = ["A", "B", "E", "G", "H", "I", "J", "K", "L"];

fn load(name: &str) -> Result<(ProjectFile, ProjectAnalysis), Box<dyn Error>> {
    let project = load_and_validate(demo_path(name), &LoadOptions::default())?;
    let analysis = analyze_project(&project.graph, &AnalysisOptions::from(&project.analysis))?;
    Ok((project, analysis))
}

fn assert_videogame_schedule(analysis: &ProjectAnalysis) {
    assert!(
        approx(analysis.project_duration(), 64.0 + 1.0 / 3.0, 1e-6),
        "duration was {}",
        analysis.project_duration()
    );

    let critical = &analysis.critical;
    assert_eq!(critical.critical_activities(), CRITICAL.to_vec());
    assert_eq!(critical.paths().len(), 1);
    assert!(!critical.is_truncated());

    let path = &critical.paths()[0];
    assert_eq!(path.activities, CRITICAL.to_vec());
    assert!(approx(path.variance, 4.0 + 1.0 / 6.0, 1e-6));
    assert!(approx(path.std_dev(), 2.0412, 1e-4));

    let slack = |id: &str| critical.float_of(id).map(|f| f.total).unwrap_or(f64::NAN);
    assert!(approx(slack("C"), 6.0 + 1.0 / 6.0, 1e-6));
    assert!(approx(slack("D"), 3.0, 1e-6));
    assert!(approx(slack("F"), 2.0 + 1.0 / 6.0, 1e-6));
    for id in CRITICAL {
        assert_eq!(slack(id), 0.0, "{id} should have exactly zero slack");
    }

    let free = |id: &str| critical.float_of(id).map(|f| f.free).unwrap_or(f64::NAN);
    assert!(approx(free("C"), 4.0, 1e-6));
    assert!(approx(free("D"), 3.0, 1e-6));
    assert!(approx(free("F"), 2.0 + 1.0 / 6.0, 1e-6));
}

#[test]
fn toml_fixture_matches_reference_schedule() -> TestResult {
    init_tracing();
    let (project, analysis) = load("videogame.toml")?;

    assert_eq!(project.graph.len(), 12);
    assert_videogame_schedule(&analysis);

    let l = analysis
        .schedule
        .entry("L")
        .ok_or("missing L")?;
    assert!(approx(l.earliest_finish, analysis.project_duration(), TOL));
    assert_eq!(project.graph.sinks(), vec!["L"]);
    assert_eq!(project.graph.sources(), vec!["A"]);
    Ok(())
}

#[test]
fn csv_fixture_matches_toml_fixture() -> TestResult {
    init_tracing();
    let (csv_project, csv_analysis) = load("videogame.csv")?;
    let (_, toml_analysis) = load("videogame.toml")?;

    assert_eq!(csv_project.graph.len(), 12);
    assert_videogame_schedule(&csv_analysis);

    let l = csv_project.graph.activity("L").ok_or("missing L")?;
    assert_eq!(l.most_likely, 11.5);
    assert_eq!(csv_analysis.schedule, toml_analysis.schedule);
    assert_eq!(csv_analysis.critical, toml_analysis.critical);
    Ok(())
}

#[test]
fn completion_probabilities_match_normal_table() -> TestResult {
    init_tracing();
    let (_, analysis) = load("videogame.toml")?;
    let dist = analysis.distribution().ok_or("no critical path")?;

    assert!(approx(dist.z_score(70.0)?, 2.776, 1e-3));
    assert!(approx(dist.probability_by(70.0)?, 0.99725, 1e-4));
    assert!(approx(dist.probability_by(60.0)?, 0.01688, 1e-4));
    assert!(approx(dist.probability_between(62.0, 68.0)?, 0.83728, 1e-4));

    let t95 = dist.duration_at_confidence(0.95)?;
    assert!(approx(dist.probability_by(t95)?, 0.95, 1e-9));
    Ok(())
}

#[test]
fn report_answers_configured_queries() -> TestResult {
    init_tracing();
    let (project, analysis) = load("videogame.toml")?;
    let report = Report::new(&project, &analysis);

    // targets [70, 60], one range, one confidence level
    assert_eq!(report.answers().len(), 4);
    assert!(report.answers().iter().all(|a| a.result.is_ok()));

    let text = report.to_string();
    assert!(text.contains("project duration: 64.3333"));
    assert!(text.contains("critical path 1: A -> B -> E -> G -> H -> I -> J -> K -> L"));
    assert!(text.contains("C = 6.1667"));
    assert!(text.contains("D = 3.0000"));
    assert!(text.contains("F = 2.1667"));
    assert!(text.contains("P(T <= 70) = 0.9973"));
    Ok(())
}
