//! The tabular state engine behind the job list.
//!
//! [`TabularEngine`] owns one view instance's rows ([`DataView`]), its active
//! column filters ([`FilterStack`]) and its row styling ([`RowStyleCache`]),
//! and keeps the three consistent across every host interaction.
//!
//! # Lifecycle
//!
//! 1. Construction reads the cross-instance cache; a hit restores the last
//!    known rows immediately.
//! 2. [`populate`](TabularEngine::populate) loads provider rows, then
//!    [`expand`](TabularEngine::expand) gives every failing row a detail row
//!    and records the base snapshot.
//! 3. Filtering and sorting rebuild the projection and recompute styling.
//!    Undoing a filter reinstates cached styling when the projection comes
//!    back unchanged.
//! 4. Detail fetch completions are applied one by one through
//!    [`apply_detail`](TabularEngine::apply_detail).
//! 5. [`teardown`](TabularEngine::teardown) writes the cache and revokes the
//!    liveness token so late completions are discarded.
//!
//! # Example
//!
//! ```
//! use jobgrid::app::{EngineSettings, TabularEngine};
//! use jobgrid::domain::{Column, JobInfo};
//! use jobgrid::storage::MemoryCache;
//! use std::collections::BTreeSet;
//!
//! let cache = MemoryCache::new();
//! let mut engine = TabularEngine::new("local", &cache, EngineSettings::default());
//! let job: JobInfo = serde_json::from_str(r#"{"jobId":"a","name":"backup","lastRunOutcome":0}"#)?;
//! engine.populate(vec![job]);
//! engine.expand(true);
//! assert_eq!(engine.projection_ids().len(), 2);
//!
//! let accepted: BTreeSet<String> = ["Succeeded".to_string()].into();
//! engine.apply_filter(Column::LastRunOutcome, accepted);
//! assert!(engine.projection_ids().is_empty());
//! # Ok::<(), jobgrid::GridError>(())
//! ```

use super::actions::JobActionContext;
use super::data_view::{DataView, Projected};
use super::filter_stack::{FilterStack, SnapshotKey};
use super::sort::compare_rows;
use super::style_cache::{Annotations, RowStyleCache};
use crate::domain::{Column, DetailRow, GridError, JobDetail, JobInfo, Result, Row, RowId};
use crate::storage::{CacheStore, CachedState};
use crate::ui::chart::{run_chart, RunBar};
use crate::worker::{DetailOutcome, DetailRequest, LivenessToken, Priority};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Engine knobs derived from [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Text of a detail row whose content has not arrived yet.
    pub loading_message: String,
    /// Prepended to the error text shown in a detail row.
    pub error_prefix: String,
    /// Shown in place of error text when a job has no history.
    pub no_steps_message: String,
    /// Number of recent runs charted per job.
    pub history_window: usize,
    /// Detail fetches in flight per priority group.
    pub detail_batch_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            loading_message: "Loading Error...".to_string(),
            error_prefix: "Error: ".to_string(),
            no_steps_message: "No Steps available for this job.".to_string(),
            history_window: 5,
            detail_batch_size: 4,
        }
    }
}

/// Active sort of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub ascending: bool,
}

#[derive(Debug)]
pub struct TabularEngine {
    server_key: String,
    settings: EngineSettings,
    jobs: Vec<JobInfo>,
    view: DataView,
    filters: FilterStack,
    styles: RowStyleCache,
    details: HashMap<String, JobDetail>,
    run_charts: HashMap<String, Vec<RunBar>>,
    sort: Option<SortState>,
    liveness: LivenessToken,
    restored: bool,
}

impl TabularEngine {
    /// Creates an engine for `server_key`, restoring cached rows if present.
    ///
    /// A cache read failure is logged and treated as a miss.
    pub fn new(server_key: impl Into<String>, cache: &dyn CacheStore, settings: EngineSettings) -> Self {
        let server_key = server_key.into();
        let mut engine = Self {
            server_key,
            settings,
            jobs: Vec::new(),
            view: DataView::new(),
            filters: FilterStack::new(),
            styles: RowStyleCache::new(),
            details: HashMap::new(),
            run_charts: HashMap::new(),
            sort: None,
            liveness: LivenessToken::new(),
            restored: false,
        };

        match cache.get(&engine.server_key) {
            Ok(Some(state)) if state.has_rows() => engine.restore_cached(state),
            Ok(_) => {}
            Err(e) => tracing::warn!(server_key = %engine.server_key, error = %e, "cache read failed"),
        }
        engine
    }

    /// Loads a cached state captured by an earlier engine.
    ///
    /// Detail rows travel with the cached rows and keep their loaded text.
    /// Filters are not part of the cache, so the restored grid is unfiltered.
    pub fn restore_cached(&mut self, state: CachedState) {
        let _span = tracing::debug_span!("restore_cached", server_key = %self.server_key).entered();
        let cached_visible = state.projection.len();

        self.jobs = state.jobs;
        self.details = state.details;
        self.run_charts = state.run_charts;
        self.reset_grid(state.rows);
        self.expand(true);
        self.restored = true;

        tracing::debug!(
            rows = self.view.items().len(),
            visible = self.view.len(),
            cached_visible,
            "engine restored from cache"
        );
    }

    /// Replaces the rows with a fresh provider listing.
    ///
    /// Starts a new population: filters, sort and styling are reset. Call
    /// [`expand`](Self::expand) afterwards to materialize detail rows.
    pub fn populate(&mut self, jobs: Vec<JobInfo>) {
        let _span = tracing::debug_span!("populate", server_key = %self.server_key, jobs = jobs.len()).entered();
        let rows = jobs.iter().map(Row::from).collect();
        self.jobs = jobs;
        self.restored = false;
        self.reset_grid(rows);
    }

    fn reset_grid(&mut self, rows: Vec<Row>) {
        self.filters.reset();
        self.styles.clear();
        self.sort = None;
        self.view.clear_filter();
        self.view.set_items(rows);
        self.view.refresh();
    }

    /// Whether the rows came from the cache rather than the provider.
    #[must_use]
    pub const fn is_restored(&self) -> bool {
        self.restored
    }

    /// Whether any rows are loaded.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.view.items().is_empty()
    }

    /// Materializes detail rows for failing records and restyles the grid.
    ///
    /// Failing rows that already own a detail row are re-annotated, never
    /// re-synthesized. With `start_indexing` every cached annotation set is
    /// dropped first, so indexing starts over from the current projection.
    ///
    /// Returns the number of detail rows synthesized.
    pub fn expand(&mut self, start_indexing: bool) -> usize {
        let _span = tracing::debug_span!("expand", start_indexing).entered();

        let pending: Vec<RowId> = self
            .view
            .items()
            .iter()
            .filter(|row| row.is_failing() && row.detail.is_none())
            .map(|row| row.id.clone())
            .collect();

        let mut synthesized = 0;
        for id in &pending {
            let detail = DetailRow::loading(id, self.settings.loading_message.clone());
            if self.view.attach_detail(id, detail) {
                synthesized += 1;
            }
        }

        if start_indexing {
            self.styles.clear();
        }
        self.view.refresh();
        self.restyle();

        tracing::debug!(synthesized, visible = self.view.len(), "rows expanded");
        synthesized
    }

    /// Recomputes styling and records it against the current snapshot.
    fn restyle(&mut self) {
        self.styles.recompute(&self.view);
        let key = self.current_key();
        self.filters.rebase(key, self.view.projection().to_vec());
        self.styles.record(key);
    }

    fn current_key(&self) -> SnapshotKey {
        self.filters.top().map_or(SnapshotKey::Base, |(key, _)| key)
    }

    fn install_filter(&mut self) {
        if self.filters.is_empty() {
            self.view.clear_filter();
        } else {
            self.view.set_filter(self.filters.predicate());
        }
        self.view.refresh();
    }

    /// Applies a column filter.
    ///
    /// A non-empty `accepted` set pushes a new snapshot for `column`. An
    /// empty set undoes the column's most recent snapshot; undoing a column
    /// with no active filter does nothing.
    ///
    /// Returns whether the grid changed.
    pub fn apply_filter(&mut self, column: Column, accepted: BTreeSet<String>) -> bool {
        let _span = tracing::debug_span!("apply_filter", column = %column, values = accepted.len()).entered();
        if !column.is_data() {
            tracing::debug!("column is not filterable");
            return false;
        }

        if accepted.is_empty() {
            if self.filters.pop(column).is_none() {
                tracing::debug!("no filter to remove");
                return false;
            }
            self.collapse(column);
            return true;
        }

        let key = self.filters.push(column, accepted, self.view.items());
        self.install_filter();
        self.styles.recompute(&self.view);
        self.styles.record(key);
        tracing::debug!(visible = self.view.len(), "filter applied");
        true
    }

    /// Removes every snapshot of `column`'s filter.
    ///
    /// Returns whether a filter was active.
    pub fn clear_filter(&mut self, column: Column) -> bool {
        let _span = tracing::debug_span!("clear_filter", column = %column).entered();
        if self.filters.clear(column).is_empty() {
            tracing::debug!("no filter to clear");
            return false;
        }
        self.collapse(column);
        true
    }

    /// Restyles the grid after `column`'s filtering was undone.
    ///
    /// Cached styling for the column's discarded snapshots is dropped. If
    /// the projection now equals the snapshot underneath, its cached styling
    /// is reinstated as is; otherwise rows are expanded and restyled from
    /// scratch.
    ///
    /// Returns `true` when cached styling was reused.
    pub fn collapse(&mut self, column: Column) -> bool {
        self.styles.forget_from(column, self.filters.depth(column));
        self.install_filter();

        let (key, unchanged) = match self.filters.top() {
            Some((key, snapshot)) => (key, snapshot.rows == self.view.projection()),
            None => (SnapshotKey::Base, false),
        };

        if unchanged && self.styles.restore(key) {
            tracing::debug!(?key, visible = self.view.len(), "styling restored");
            return true;
        }
        tracing::debug!(?key, visible = self.view.len(), "projection changed, re-expanding");
        self.expand(false);
        false
    }

    /// Sorts records on `column`; detail rows stay under their parents.
    ///
    /// Returns whether the grid changed.
    pub fn sort(&mut self, column: Column, ascending: bool) -> bool {
        let _span = tracing::debug_span!("sort", column = %column, ascending).entered();
        if !column.is_data() {
            tracing::debug!("column is not sortable");
            return false;
        }
        self.view.sort(|a, b| compare_rows(column, a, b), ascending);
        self.view.refresh();
        self.restyle();
        self.sort = Some(SortState { column, ascending });
        true
    }

    /// Visible rows in display order, detail rows included.
    #[must_use]
    pub fn projection(&self) -> Vec<Projected<'_>> {
        self.view.projected()
    }

    #[must_use]
    pub fn projection_ids(&self) -> &[RowId] {
        self.view.projection()
    }

    /// Style annotations of the current projection, by row index.
    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        self.styles.current()
    }

    /// Row index to field id to class name, as the host applies it.
    #[must_use]
    pub fn column_annotations(&self) -> BTreeMap<usize, BTreeMap<&'static str, &'static str>> {
        self.styles
            .current()
            .iter()
            .map(|(index, annotation)| (*index, annotation.column_classes()))
            .collect()
    }

    /// Number of full styling recomputations so far.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.styles.recomputations()
    }

    #[must_use]
    pub const fn view(&self) -> &DataView {
        &self.view
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterStack {
        &self.filters
    }

    #[must_use]
    pub const fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn server_key(&self) -> &str {
        &self.server_key
    }

    /// Distinct values of `column` across all records, for filter menus.
    #[must_use]
    pub fn column_values(&self, column: Column) -> BTreeSet<String> {
        self.view
            .items()
            .iter()
            .filter_map(|row| row.value(column))
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn job(&self, job_id: &str) -> Option<&JobInfo> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    #[must_use]
    pub fn jobs(&self) -> &[JobInfo] {
        &self.jobs
    }

    #[must_use]
    pub fn detail(&self, job_id: &str) -> Option<&JobDetail> {
        self.details.get(job_id)
    }

    #[must_use]
    pub fn run_chart(&self, job_id: &str) -> Option<&[RunBar]> {
        self.run_charts.get(job_id).map(Vec::as_slice)
    }

    fn job_at(&self, index: usize) -> Option<&JobInfo> {
        let record = self.view.entry_at(index)?.record();
        let job_id = record.entity_id.as_deref().unwrap_or(record.id.as_str());
        self.job(job_id)
    }

    /// Job behind the row at `index`; a detail row resolves to its parent.
    #[must_use]
    pub fn row_activated(&self, index: usize) -> Option<&JobInfo> {
        let job = self.job_at(index);
        tracing::debug!(index, job_id = ?job.map(|j| &j.job_id), "row activated");
        job
    }

    /// Context for the row's action menu.
    #[must_use]
    pub fn table_context(&self, index: usize) -> Option<JobActionContext> {
        let job = self.job_at(index)?;
        let detail = self.details.get(&job.job_id);
        Some(JobActionContext::new(
            job.clone(),
            detail.map(|d| d.steps.clone()),
            detail.map(|d| d.schedules.clone()),
        ))
    }

    /// One detail request per record, failing records first.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<DetailRequest> {
        let mut requests: Vec<DetailRequest> = self
            .view
            .items()
            .iter()
            .map(|row| DetailRequest {
                row_id: row.id.clone(),
                label: row.name().to_string(),
                group_key: row.value(Column::TargetDatabase).unwrap_or_default().to_string(),
                priority: if row.is_failing() { Priority::Failing } else { Priority::Passing },
            })
            .collect();
        requests.sort_by_key(|r| r.priority);
        requests
    }

    /// Applies one completed detail fetch.
    ///
    /// Stores the detail and the run chart, and resolves the row's detail
    /// text to the latest run's message, or to the no-steps placeholder when
    /// the job has no history or the fetch failed. A loaded detail row never
    /// returns to loading.
    ///
    /// Returns whether anything visible changed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::StaleCompletion`] after [`teardown`](Self::teardown);
    /// nothing is mutated in that case.
    pub fn apply_detail(&mut self, outcome: DetailOutcome) -> Result<bool> {
        if !self.liveness.is_live() {
            return Err(GridError::StaleCompletion {
                row_id: outcome.row_id.to_string(),
            });
        }
        let _span = tracing::debug_span!("apply_detail", row_id = %outcome.row_id).entered();

        let job_id = match self.view.item_by_id(&outcome.row_id) {
            Some(row) => row.entity_id.clone().unwrap_or_else(|| row.id.to_string()),
            None => {
                tracing::debug!("detail for unknown row ignored");
                return Ok(false);
            }
        };

        let latest_message = match outcome.result {
            Ok(detail) => {
                let chart = run_chart(&detail.histories, self.settings.history_window);
                if !chart.is_empty() {
                    self.run_charts.insert(job_id.clone(), chart);
                }
                let message = detail.histories.last().map(|h| h.message.clone());
                self.details.insert(job_id, detail);
                message
            }
            Err(e) => {
                tracing::debug!(error = %e, "detail fetch failed, using placeholder");
                None
            }
        };

        let text = format!(
            "{}{}",
            self.settings.error_prefix,
            latest_message.unwrap_or_else(|| self.settings.no_steps_message.clone())
        );
        self.view.update_detail(&outcome.row_id, |detail| detail.resolve(text));
        Ok(true)
    }

    /// Captures the state for the cross-instance cache.
    #[must_use]
    pub fn snapshot(&self) -> CachedState {
        CachedState {
            server_key: self.server_key.clone(),
            jobs: self.jobs.clone(),
            rows: self.view.items().to_vec(),
            projection: self.view.projection().to_vec(),
            details: self.details.clone(),
            run_charts: self.run_charts.clone(),
        }
    }

    /// Token that in-flight work checks before delivering results.
    #[must_use]
    pub fn liveness(&self) -> LivenessToken {
        self.liveness.clone()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        !self.liveness.is_live()
    }

    /// Revokes liveness and drops the grid, returning the state to cache.
    ///
    /// Returns `None` when already retired or when nothing was loaded.
    pub fn retire(&mut self) -> Option<CachedState> {
        if self.is_torn_down() {
            return None;
        }
        let _span = tracing::debug_span!("retire", server_key = %self.server_key).entered();
        let state = self.is_populated().then(|| self.snapshot());
        self.liveness.revoke();
        self.reset_grid(Vec::new());
        tracing::debug!(cached = state.is_some(), "engine retired");
        state
    }

    /// Retires the engine and writes its final state to `cache`.
    ///
    /// A cache write failure is logged; a second call does nothing.
    pub fn teardown(&mut self, cache: &dyn CacheStore) {
        let Some(state) = self.retire() else {
            return;
        };
        if let Err(e) = cache.put(&self.server_key, state) {
            tracing::warn!(server_key = %self.server_key, error = %e, "cache write failed at teardown");
        }
    }
}
