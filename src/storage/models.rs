//! Cached grid state.
//!
//! [`CachedState`] is what one view leaves behind for the next view opened on
//! the same server: the row list as last displayed, the projection, and the
//! per-job detail and chart data gathered by history loading.

use crate::domain::{JobDetail, JobInfo, Row, RowId};
use crate::ui::chart::RunBar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedState {
    /// Server the state was captured from.
    pub server_key: String,

    /// Provider records in the order they were fetched.
    #[serde(default)]
    pub jobs: Vec<JobInfo>,

    /// Grid rows in display order, detail rows included as owned children.
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Visible row ids at capture time.
    #[serde(default)]
    pub projection: Vec<RowId>,

    /// Job id to fetched detail.
    #[serde(default)]
    pub details: HashMap<String, JobDetail>,

    /// Job id to previous-runs chart.
    #[serde(default)]
    pub run_charts: HashMap<String, Vec<RunBar>>,
}

impl CachedState {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            ..Self::default()
        }
    }

    /// Whether a row list was captured.
    #[must_use]
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}
