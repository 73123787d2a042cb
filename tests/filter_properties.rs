use jobgrid::app::{compare_rows, EngineSettings, TabularEngine};
use jobgrid::domain::{Column, JobInfo, Row, RowId};
use jobgrid::storage::MemoryCache;
use proptest::prelude::*;
use std::collections::BTreeSet;

const NAMES: [&str; 4] = ["alpha", "bravo", "Alpha", "delta"];
const CATEGORIES: [&str; 3] = ["", "maintenance", "reports"];
const FILTER_COLUMNS: [Column; 4] = [Column::Name, Column::Enabled, Column::Category, Column::LastRunOutcome];

fn job_strategy() -> impl Strategy<Value = (usize, usize, bool, i32)> {
    (0..NAMES.len(), 0..CATEGORIES.len(), any::<bool>(), 0..6i32)
}

fn build_jobs(specs: &[(usize, usize, bool, i32)]) -> Vec<JobInfo> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (name, category, enabled, outcome))| JobInfo {
            job_id: format!("j{i}"),
            name: NAMES[*name].to_string(),
            target_database: "master".to_string(),
            last_run: String::new(),
            next_run: String::new(),
            enabled: *enabled,
            current_execution_status: 4,
            category: CATEGORIES[*category].to_string(),
            runnable: true,
            has_schedule: false,
            last_run_outcome: *outcome,
        })
        .collect()
}

fn engine_for(jobs: Vec<JobInfo>) -> TabularEngine {
    let mut engine = TabularEngine::new("prop", &MemoryCache::new(), EngineSettings::default());
    engine.populate(jobs);
    engine.expand(true);
    engine
}

fn ids(engine: &TabularEngine) -> Vec<String> {
    engine.projection_ids().iter().map(RowId::to_string).collect()
}

/// Picks a non-empty accepted set for `column` from the values present,
/// plus one value no row carries.
fn accepted_for(engine: &TabularEngine, column: Column, mask: u8) -> BTreeSet<String> {
    let mut accepted: BTreeSet<String> = engine
        .column_values(column)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << (i % 8)) != 0)
        .map(|(_, v)| v)
        .collect();
    accepted.insert("no such value".to_string());
    accepted
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn undoing_filters_in_reverse_restores_projection(
        specs in prop::collection::vec(job_strategy(), 0..12),
        filters in prop::collection::vec((0..FILTER_COLUMNS.len(), any::<u8>()), 1..6),
    ) {
        let mut engine = engine_for(build_jobs(&specs));
        let before = ids(&engine);
        let annotations_before = engine.annotations().clone();

        let mut applied = Vec::new();
        for (column, mask) in filters {
            let column = FILTER_COLUMNS[column];
            let accepted = accepted_for(&engine, column, mask);
            prop_assert!(engine.apply_filter(column, accepted));
            applied.push(column);
        }

        for column in applied.into_iter().rev() {
            prop_assert!(engine.apply_filter(column, BTreeSet::new()));
        }

        prop_assert_eq!(ids(&engine), before);
        prop_assert_eq!(engine.annotations(), &annotations_before);
        prop_assert!(engine.filters().is_empty());
    }

    #[test]
    fn every_failing_job_owns_exactly_one_following_detail_row(
        specs in prop::collection::vec(job_strategy(), 0..12),
    ) {
        let jobs = build_jobs(&specs);
        let failing: BTreeSet<String> = jobs
            .iter()
            .filter(|j| j.is_failing())
            .map(|j| j.job_id.clone())
            .collect();

        let mut engine = TabularEngine::new("prop", &MemoryCache::new(), EngineSettings::default());
        engine.populate(jobs);
        prop_assert!(engine.projection_ids().iter().all(|id| !id.is_detail()));

        engine.expand(true);
        let projection = ids(&engine);
        let details = projection.iter().filter(|id| id.ends_with(".error")).count();
        prop_assert_eq!(details, failing.len());

        for (i, id) in projection.iter().enumerate() {
            if failing.contains(id) {
                let expected = format!("{id}.error");
                prop_assert_eq!(projection.get(i + 1), Some(&expected));
            }
        }
    }

    #[test]
    fn sorting_matches_a_stable_sort_of_the_records(
        specs in prop::collection::vec(job_strategy(), 0..12),
        column in 0..FILTER_COLUMNS.len(),
        ascending in any::<bool>(),
    ) {
        let column = FILTER_COLUMNS[column];
        let jobs = build_jobs(&specs);
        let mut rows: Vec<Row> = jobs.iter().map(Row::from).collect();
        rows.sort_by(|a, b| {
            let ordering = compare_rows(column, a, b);
            if ascending { ordering } else { ordering.reverse() }
        });
        let expected: Vec<String> = rows.iter().map(|r| r.id.to_string()).collect();

        let mut engine = engine_for(jobs);
        engine.sort(column, ascending);
        let records: Vec<String> = engine
            .projection_ids()
            .iter()
            .filter(|id| !id.is_detail())
            .map(RowId::to_string)
            .collect();
        prop_assert_eq!(records, expected);
    }
}
