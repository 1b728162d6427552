// tests/property_schedule.rs
mod common;
use crate::common::builders::{ActivityBuilder, ProjectBuilder};

use std::collections::BTreeSet;

use pertdag::config::ActivityRecord;
use pertdag::dag::ProjectGraph;
use pertdag::engine::{AnalysisOptions, analyze_project, estimate_all, probability_of_completion_by};
use proptest::prelude::*;
use proptest::sample::Index;

// Strategy to generate a valid activity list.
// Acyclicity comes from only letting activity N follow activities 0..N-1.
// `scale` multiplies every estimate.
fn records_strategy(max_activities: usize, scale: f64) -> impl Strategy<Value = Vec<ActivityRecord>> {
    (1..=max_activities).prop_flat_map(move |count| {
        let estimates = proptest::collection::vec((0.5f64..10.0, 0.0f64..5.0, 0.0f64..5.0), count);
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..count),
            count,
        );

        (estimates, deps).prop_map(move |(estimates, deps)| {
            estimates
                .into_iter()
                .zip(deps)
                .enumerate()
                .map(|(i, ((a, d1, d2), potential))| {
                    let (a, d1, d2) = (a * scale, d1 * scale, d2 * scale);
                    let mut activity = ActivityBuilder::pert(&format!("act_{i}"), a, a + d1, a + d1 + d2);
                    let valid: BTreeSet<usize> = potential
                        .into_iter()
                        .filter(|_| i > 0)
                        .map(|d| d % i)
                        .collect();
                    for dep in valid {
                        activity = activity.after(&format!("act_{dep}"));
                    }
                    activity.build()
                })
                .collect()
        })
    })
}

fn graph_of(records: &[ActivityRecord]) -> ProjectGraph {
    records
        .iter()
        .cloned()
        .fold(ProjectBuilder::new(), |b, r| b.with_activity(r))
        .build_graph()
}

proptest! {
    #[test]
    fn slack_is_never_negative_and_zero_means_critical(records in records_strategy(12, 1.0)) {
        let graph = graph_of(&records);
        let analysis = analyze_project(&graph, &AnalysisOptions::default()).unwrap();

        for (id, float) in analysis.critical.floats() {
            prop_assert!(float.total >= 0.0, "{} has slack {}", id, float.total);
            prop_assert!(float.free >= 0.0, "{} has free float {}", id, float.free);
            prop_assert!(float.free <= float.total + 1e-6, "{}: free exceeds total", id);
            prop_assert_eq!(float.critical, float.total == 0.0);
        }
        prop_assert!(!analysis.critical.critical_activities().is_empty());
    }

    #[test]
    fn duration_is_finish_of_every_critical_sink(records in records_strategy(12, 1.0)) {
        let graph = graph_of(&records);
        let analysis = analyze_project(&graph, &AnalysisOptions::default()).unwrap();
        let duration = analysis.project_duration();

        let mut critical_sinks = 0;
        for sink in graph.sinks() {
            let entry = analysis.schedule.entry(sink).unwrap();
            prop_assert!(entry.earliest_finish <= duration);
            if analysis.critical.is_critical(sink) {
                critical_sinks += 1;
                prop_assert!((entry.earliest_finish - duration).abs() <= 1e-9);
            }
        }
        prop_assert!(critical_sinks >= 1);

        for path in analysis.critical.paths() {
            prop_assert!((path.expected_duration - duration).abs() <= 1e-6 * duration.max(1.0));
        }
    }

    #[test]
    fn schedule_ignores_record_order(
        (records, shuffled) in records_strategy(10, 1.0)
            .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
    ) {
        let original = analyze_project(&graph_of(&records), &AnalysisOptions::default()).unwrap();
        let reordered = analyze_project(&graph_of(&shuffled), &AnalysisOptions::default()).unwrap();

        prop_assert_eq!(original.project_duration(), reordered.project_duration());
        for record in &records {
            prop_assert_eq!(
                original.schedule.entry(&record.id),
                reordered.schedule.entry(&record.id)
            );
            prop_assert_eq!(
                original.critical.is_critical(&record.id),
                reordered.critical.is_critical(&record.id)
            );
        }
    }

    #[test]
    fn estimates_stay_within_bounds(records in records_strategy(12, 1.0)) {
        let graph = graph_of(&records);
        let estimates = estimate_all(&graph);

        for (activity, estimate) in graph.activities().zip(estimates.iter()) {
            prop_assert!(estimate.expected >= activity.optimistic);
            prop_assert!(estimate.expected <= activity.pessimistic);
            prop_assert!(estimate.variance >= 0.0);
        }
    }

    #[test]
    fn completion_probability_is_monotone(
        mean in -100.0f64..100.0,
        variance in 0.01f64..100.0,
        t1 in -200.0f64..200.0,
        dt in 0.0f64..50.0,
    ) {
        let p1 = probability_of_completion_by(t1, mean, variance).unwrap();
        let p2 = probability_of_completion_by(t1 + dt, mean, variance).unwrap();
        prop_assert!((0.0..=1.0).contains(&p1));
        prop_assert!(p1 <= p2 + 1e-12, "P({}) = {} > P({}) = {}", t1, p1, t1 + dt, p2);

        let half = probability_of_completion_by(mean, mean, variance).unwrap();
        prop_assert!((half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dropping_a_slack_dependency_keeps_duration(
        records in records_strategy(12, 1.0),
        pick in any::<Index>(),
        edge in any::<Index>(),
    ) {
        let before = analyze_project(&graph_of(&records), &AnalysisOptions::default()).unwrap();

        let candidates: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.predecessors.is_empty() && !before.critical.is_critical(&r.id))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return Ok(());
        }

        let target = candidates[pick.index(candidates.len())];
        let mut relaxed = records.clone();
        let dropped = edge.index(relaxed[target].predecessors.len());
        relaxed[target].predecessors.remove(dropped);

        let after = analyze_project(&graph_of(&relaxed), &AnalysisOptions::default()).unwrap();
        let duration = before.project_duration();
        prop_assert!(
            (after.project_duration() - duration).abs() <= 1e-9 * duration.max(1.0),
            "dropping a dependency of {} moved the duration {} -> {}",
            records[target].id,
            duration,
            after.project_duration()
        );
    }

    #[test]
    fn large_estimates_still_yield_a_critical_chain(records in records_strategy(12, 1.0e6)) {
        let graph = graph_of(&records);
        let analysis = analyze_project(&graph, &AnalysisOptions::default()).unwrap();
        let duration = analysis.project_duration();

        prop_assert!(!analysis.critical.paths().is_empty());
        for (id, float) in analysis.critical.floats() {
            prop_assert!(float.total >= 0.0, "{} has slack {}", id, float.total);
        }
        for path in analysis.critical.paths() {
            prop_assert!((path.expected_duration - duration).abs() <= 1e-9 * duration.max(1.0));
        }
    }
}

