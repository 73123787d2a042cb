//! JSON fixture provider.
//!
//! Serves a fixed job list and per-job detail from a JSON document:
//!
//! ```json
//! {
//!   "jobs": [{ "jobId": "j1", "name": "nightly", "lastRunOutcome": 0 }],
//!   "details": {
//!     "j1": { "histories": [{ "runStatus": 0, "runDuration": "00:01:10", "message": "disk full" }] }
//!   }
//! }
//! ```
//!
//! Jobs without a `details` entry fail their detail fetch.

use super::{JobProvider, OwnerContext};
use crate::domain::{GridError, JobDetail, JobInfo, Result};
use crate::worker::DetailRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub jobs: Vec<JobInfo>,
    #[serde(default)]
    pub details: HashMap<String, JobDetail>,
    /// When set, listing jobs fails as if the server were unreachable.
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Default)]
pub struct FixtureProvider {
    fixture: Fixture,
    row_fetches: AtomicUsize,
    detail_fetches: AtomicUsize,
}

impl FixtureProvider {
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            row_fetches: AtomicUsize::new(0),
            detail_fetches: AtomicUsize::new(0),
        }
    }

    /// Parses a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading fixture");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Number of `fetch_rows` calls served so far.
    #[must_use]
    pub fn row_fetches(&self) -> usize {
        self.row_fetches.load(Ordering::Relaxed)
    }

    /// Number of `fetch_row_detail` calls served so far.
    #[must_use]
    pub fn detail_fetches(&self) -> usize {
        self.detail_fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl JobProvider for FixtureProvider {
    async fn fetch_rows(&self, owner: &OwnerContext) -> Result<Vec<JobInfo>> {
        self.row_fetches.fetch_add(1, Ordering::Relaxed);
        if self.fixture.unavailable {
            return Err(GridError::ProviderUnavailable(format!(
                "no job service for {}",
                owner.owner_uri
            )));
        }
        Ok(self.fixture.jobs.clone())
    }

    async fn fetch_row_detail(&self, _owner: &OwnerContext, request: &DetailRequest) -> Result<JobDetail> {
        self.detail_fetches.fetch_add(1, Ordering::Relaxed);
        self.fixture
            .details
            .get(request.row_id.as_str())
            .cloned()
            .ok_or_else(|| GridError::DetailFetchFailed {
                row_id: request.row_id.to_string(),
                message: "no detail recorded".to_string(),
            })
    }
}
