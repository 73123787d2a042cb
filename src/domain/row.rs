//! Grid row model.
//!
//! A [`Row`] is one job record as the grid sees it: display values keyed by
//! column, the last outcome, and at most one owned [`DetailRow`] that the
//! projection places directly beneath it. The detail never points back at its
//! parent; the parent is recovered from the detail's identifier or from the
//! data view's lookup table.

use super::column::Column;
use super::job::{execution_status_label, last_run_label, next_run_label, yes_no, JobInfo, RunOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Suffix appended to a parent's id to form its detail row's id.
pub const DETAIL_SUFFIX: &str = ".error";

/// Identifier of a row in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the detail row owned by this row.
    ///
    /// # Example
    ///
    /// ```
    /// use jobgrid::domain::RowId;
    ///
    /// assert_eq!(RowId::new("a").detail_id().as_str(), "a.error");
    /// ```
    #[must_use]
    pub fn detail_id(&self) -> Self {
        Self(format!("{}{DETAIL_SUFFIX}", self.0))
    }

    #[must_use]
    pub fn is_detail(&self) -> bool {
        self.0.ends_with(DETAIL_SUFFIX)
    }

    /// Identifier of the parent when this is a detail row id.
    #[must_use]
    pub fn parent_id(&self) -> Option<Self> {
        self.0.strip_suffix(DETAIL_SUFFIX).map(|p| Self(p.to_string()))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for RowId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RowId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lifecycle of a detail row's content.
///
/// `LoadingDetail` moves to `DetailLoaded` once the row's history arrives (or
/// fails). Nothing moves a row back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailState {
    Collapsed,
    LoadingDetail,
    DetailLoaded,
}

/// Synthetic row shown beneath a failing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub id: RowId,
    pub message: String,
    pub state: DetailState,
}

impl DetailRow {
    /// Synthesizes the loading placeholder for `parent`.
    #[must_use]
    pub fn loading(parent: &RowId, message: impl Into<String>) -> Self {
        Self {
            id: parent.detail_id(),
            message: message.into(),
            state: DetailState::LoadingDetail,
        }
    }

    /// Replaces the content and marks it loaded.
    pub fn resolve(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.state = DetailState::DetailLoaded;
    }
}

/// One job record in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    /// Key of the owning entity (the job id).
    pub entity_id: Option<String>,
    pub values: BTreeMap<Column, String>,
    pub last_outcome: Option<RunOutcome>,
    pub detail: Option<DetailRow>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            entity_id: None,
            values: BTreeMap::new(),
            last_outcome: None,
            detail: None,
        }
    }

    /// Sets a column value, builder style.
    #[must_use]
    pub fn with_value(mut self, column: Column, value: impl Into<String>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    /// Sets the outcome and its Last Run Outcome column value.
    #[must_use]
    pub fn with_outcome(mut self, outcome: RunOutcome) -> Self {
        self.last_outcome = Some(outcome);
        self.values.insert(Column::LastRunOutcome, outcome.label().to_string());
        self
    }

    #[must_use]
    pub fn value(&self, column: Column) -> Option<&str> {
        self.values.get(&column).map(String::as_str)
    }

    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.last_outcome == Some(RunOutcome::Failed)
    }

    #[must_use]
    pub fn detail_state(&self) -> DetailState {
        self.detail.as_ref().map_or(DetailState::Collapsed, |d| d.state)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.value(Column::Name).unwrap_or_default()
    }
}

impl From<&str> for Row {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&JobInfo> for Row {
    fn from(job: &JobInfo) -> Self {
        let outcome = job.outcome();
        let mut values = BTreeMap::new();
        values.insert(Column::Name, job.name.clone());
        values.insert(Column::TargetDatabase, job.target_database.clone());
        values.insert(Column::LastRun, last_run_label(&job.last_run));
        values.insert(Column::NextRun, next_run_label(&job.next_run));
        values.insert(Column::Enabled, yes_no(job.enabled).to_string());
        values.insert(Column::Status, execution_status_label(job.current_execution_status).to_string());
        values.insert(Column::Category, job.category.clone());
        values.insert(Column::Runnable, yes_no(job.runnable).to_string());
        values.insert(Column::Schedule, yes_no(job.has_schedule).to_string());
        values.insert(Column::LastRunOutcome, outcome.label().to_string());

        Self {
            id: RowId::new(job.job_id.clone()),
            entity_id: Some(job.job_id.clone()),
            values,
            last_outcome: Some(outcome),
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_ids_are_derived_from_the_parent() {
        let id = RowId::new("job-7");
        let detail = id.detail_id();
        assert!(detail.is_detail());
        assert_eq!(detail.parent_id(), Some(id.clone()));
        assert!(!id.is_detail());
        assert_eq!(id.parent_id(), None);
    }

    #[test]
    fn detail_lifecycle_only_moves_forward() {
        let mut row = Row::new("a").with_outcome(RunOutcome::Failed);
        assert_eq!(row.detail_state(), DetailState::Collapsed);

        row.detail = Some(DetailRow::loading(&row.id, "Loading Error..."));
        assert_eq!(row.detail_state(), DetailState::LoadingDetail);

        if let Some(detail) = row.detail.as_mut() {
            detail.resolve("Error: disk full");
        }
        assert_eq!(row.detail_state(), DetailState::DetailLoaded);
    }

    #[test]
    fn rows_convert_from_job_info() {
        let job = JobInfo {
            job_id: "j1".into(),
            name: "backup".into(),
            target_database: "master".into(),
            last_run: "1/1/0001 12:00:00 AM".into(),
            next_run: "3/14/2019 10:00:00 AM".into(),
            enabled: true,
            current_execution_status: 4,
            category: "[Uncategorized (Local)]".into(),
            runnable: true,
            has_schedule: false,
            last_run_outcome: 0,
        };
        let row = Row::from(&job);
        assert_eq!(row.id.as_str(), "j1");
        assert_eq!(row.entity_id.as_deref(), Some("j1"));
        assert_eq!(row.value(Column::LastRun), Some("Never Run"));
        assert_eq!(row.value(Column::Enabled), Some("Yes"));
        assert_eq!(row.value(Column::Schedule), Some("No"));
        assert_eq!(row.value(Column::Status), Some("Idle"));
        assert_eq!(row.value(Column::LastRunOutcome), Some("Failed"));
        assert!(row.is_failing());
        assert_eq!(row.name(), "backup");
    }
}
