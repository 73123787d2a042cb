//! View model types representing the renderable grid.
//!
//! A [`GridViewModel`] is computed from a [`TabularEngine`] snapshot and holds
//! only display-ready data: one [`DisplayRow`] per projection entry, in
//! projection order, with its style class and outcome indicator resolved.
//!
//! # Example
//!
//! ```
//! use jobgrid::app::{EngineSettings, TabularEngine};
//! use jobgrid::storage::MemoryCache;
//! use jobgrid::ui::GridViewModel;
//!
//! let engine = TabularEngine::new("local", &MemoryCache::new(), EngineSettings::default());
//! let vm = GridViewModel::compute(&engine);
//! assert!(vm.empty_state.is_some());
//! ```

use super::chart::RunBar;
use crate::app::{Projected, RowClass, TabularEngine};
use crate::domain::Column;

#[derive(Debug, Clone)]
pub struct GridViewModel {
    pub header: HeaderInfo,
    /// Column order of every record row's cells.
    pub columns: Vec<Column>,
    pub rows: Vec<DisplayRow>,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Records passing the filters.
    pub visible: usize,
    /// Records loaded.
    pub total: usize,
    /// `"Column: v1, v2"` per active filter, in application order.
    pub filters: Vec<String>,
    /// `"Column ▲"` or `"Column ▼"`.
    pub sort: Option<String>,
}

/// One projection entry.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    pub id: String,
    /// One cell per column for records; a single message cell for detail rows.
    pub cells: Vec<String>,
    pub is_detail: bool,
    pub class: Option<RowClass>,
    /// Outcome indicator class of the record.
    pub indicator: Option<&'static str>,
    pub chart: Vec<RunBar>,
}

#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

impl GridViewModel {
    /// Builds the view model for the engine's current projection.
    #[must_use]
    pub fn compute(engine: &TabularEngine) -> Self {
        let columns = Column::ALL.to_vec();
        let annotations = engine.annotations();

        let rows: Vec<DisplayRow> = engine
            .projection()
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let class = annotations.get(&index).map(|a| a.class);
                match entry {
                    Projected::Record(row) => DisplayRow {
                        id: row.id.to_string(),
                        cells: columns
                            .iter()
                            .map(|c| row.value(*c).unwrap_or_default().to_string())
                            .collect(),
                        is_detail: false,
                        class,
                        indicator: row.last_outcome.map(|o| o.indicator_class()),
                        chart: engine
                            .run_chart(row.entity_id.as_deref().unwrap_or(row.id.as_str()))
                            .map(<[RunBar]>::to_vec)
                            .unwrap_or_default(),
                    },
                    Projected::Detail { detail, .. } => DisplayRow {
                        id: detail.id.to_string(),
                        cells: vec![detail.message.clone()],
                        is_detail: true,
                        class,
                        indicator: None,
                        chart: Vec::new(),
                    },
                }
            })
            .collect();

        let filters = engine
            .filters()
            .active_columns()
            .iter()
            .filter_map(|column| {
                engine.filters().accepted(*column).map(|values| {
                    let values: Vec<&str> = values.iter().map(String::as_str).collect();
                    format!("{column}: {}", values.join(", "))
                })
            })
            .collect();

        let visible = rows.iter().filter(|r| !r.is_detail).count();
        let total = engine.view().items().len();
        let empty_state = rows.is_empty().then(|| EmptyState {
            message: "No jobs to show".to_string(),
            subtitle: if total > 0 {
                "No job matches the active filters".to_string()
            } else {
                "The server reported no jobs".to_string()
            },
        });

        Self {
            header: HeaderInfo {
                title: format!("Jobs on {}", engine.server_key()),
                visible,
                total,
                filters,
                sort: engine
                    .sort_state()
                    .map(|s| format!("{} {}", s.column, if s.ascending { '▲' } else { '▼' })),
            },
            columns,
            rows,
            empty_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineSettings;
    use crate::domain::JobInfo;
    use crate::storage::MemoryCache;
    use std::collections::BTreeSet;

    fn engine() -> TabularEngine {
        let jobs: Vec<JobInfo> = serde_json::from_str(
            r#"[
                {"jobId":"a","name":"alpha","lastRunOutcome":0},
                {"jobId":"b","name":"bravo","lastRunOutcome":1}
            ]"#,
        )
        .unwrap();
        let mut engine = TabularEngine::new("prod", &MemoryCache::new(), EngineSettings::default());
        engine.populate(jobs);
        engine.expand(true);
        engine
    }

    #[test]
    fn rows_follow_projection_with_classes() {
        let vm = GridViewModel::compute(&engine());
        assert_eq!(vm.header.title, "Jobs on prod");
        assert_eq!((vm.header.visible, vm.header.total), (2, 2));

        let ids: Vec<&str> = vm.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "a.error", "b"]);
        assert_eq!(vm.rows[0].class, Some(RowClass::JobWithError));
        assert_eq!(vm.rows[1].class, Some(RowClass::ErrorRow));
        assert_eq!(vm.rows[1].cells, ["Loading Error..."]);
        assert_eq!(vm.rows[2].class, None);
        assert_eq!(vm.rows[2].indicator, Some("jobview-jobnameindicatorsuccess"));
        assert_eq!(vm.rows[2].cells.len(), Column::ALL.len());
    }

    #[test]
    fn header_lists_filters_and_sort() {
        let mut engine = engine();
        let accepted: BTreeSet<String> = ["No".to_string()].into();
        engine.apply_filter(Column::Enabled, accepted);
        engine.sort(Column::Name, false);

        let vm = GridViewModel::compute(&engine);
        assert_eq!(vm.header.filters, ["Enabled: No"]);
        assert_eq!(vm.header.sort.as_deref(), Some("Name ▼"));
    }

    #[test]
    fn filtered_out_grid_explains_itself() {
        let mut engine = engine();
        let accepted: BTreeSet<String> = ["Cancelled".to_string()].into();
        engine.apply_filter(Column::LastRunOutcome, accepted);

        let vm = GridViewModel::compute(&engine);
        let empty = vm.empty_state.unwrap();
        assert_eq!(empty.subtitle, "No job matches the active filters");
    }
}
