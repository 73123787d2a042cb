//! Job provider abstraction.
//!
//! A [`JobProvider`] is the inbound side of the grid: it lists the jobs of a
//! server and fetches one job's steps, schedules and run history. Providers
//! are asynchronous and may fail; the view turns failures into empty lists and
//! placeholder text rather than surfacing them.
//!
//! - [`JobProvider`]: the trait
//! - [`FixtureProvider`]: JSON backed provider used by the CLI and tests

pub mod fixture;

use crate::domain::{JobDetail, JobInfo, Result};
use crate::worker::DetailRequest;
use async_trait::async_trait;

pub use fixture::{Fixture, FixtureProvider};

/// Identifies the connection a view was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    /// Connection owner URI passed to every provider call.
    pub owner_uri: String,
    /// Server name the cross-instance cache is keyed by.
    pub server_key: String,
}

impl OwnerContext {
    pub fn new(owner_uri: impl Into<String>, server_key: impl Into<String>) -> Self {
        Self {
            owner_uri: owner_uri.into(),
            server_key: server_key.into(),
        }
    }
}

#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Lists every job on the owner's server.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ProviderUnavailable`](crate::GridError::ProviderUnavailable)
    /// when the server cannot be queried.
    async fn fetch_rows(&self, owner: &OwnerContext) -> Result<Vec<JobInfo>>;

    /// Fetches steps, schedules and history of the requested job.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DetailFetchFailed`](crate::GridError::DetailFetchFailed)
    /// when the detail cannot be retrieved.
    async fn fetch_row_detail(&self, owner: &OwnerContext, request: &DetailRequest) -> Result<JobDetail>;
}
