//! View driver for one job list instance.
//!
//! [`JobListView`] wires a provider and the cross-instance cache to a
//! [`TabularEngine`]. It enforces a single row fetch per view, prefers
//! cached rows unless a refresh was requested, runs history loading with
//! completions applied as they arrive, and hands the final state to the
//! cache at teardown.

use super::actions::Action;
use super::engine::{EngineSettings, TabularEngine};
use super::handler::{handle_event, Event};
use crate::domain::Result;
use crate::provider::{JobProvider, OwnerContext};
use crate::storage::CacheStore;
use crate::worker::{load_details, DetailRequest, LoadSummary};

/// Row fetch progress of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
}

pub struct JobListView<P, C> {
    provider: P,
    cache: C,
    owner: OwnerContext,
    engine: TabularEngine,
    fetch_state: FetchState,
    refresh_requested: bool,
    pending_details: Vec<DetailRequest>,
    history_job: Option<String>,
}

impl<P, C> JobListView<P, C>
where
    P: JobProvider,
    C: CacheStore,
{
    /// Opens a view on `owner`'s server. Cached rows, if any, are restored
    /// immediately.
    pub fn new(provider: P, cache: C, owner: OwnerContext, settings: EngineSettings) -> Self {
        let engine = TabularEngine::new(owner.server_key.clone(), &cache, settings);
        Self {
            provider,
            cache,
            owner,
            engine,
            fetch_state: FetchState::Idle,
            refresh_requested: false,
            pending_details: Vec::new(),
            history_job: None,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &TabularEngine {
        &self.engine
    }

    #[must_use]
    pub const fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Job whose history the host was asked to show last.
    #[must_use]
    pub fn history_job(&self) -> Option<&str> {
        self.history_job.as_deref()
    }

    /// Makes the next [`on_first_visible`](Self::on_first_visible) fetch
    /// from the provider even when cached rows exist.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Populates the grid the first time the view becomes visible.
    ///
    /// Uses cached rows when present and no refresh was requested, otherwise
    /// fetches from the provider; a provider failure yields an empty grid.
    /// Then loads every row's detail.
    ///
    /// Returns `false` without doing anything when the view was already
    /// populated or is still loading.
    ///
    /// # Errors
    ///
    /// Returns an error only if applying the rows to the engine fails.
    pub async fn on_first_visible(&mut self) -> Result<bool> {
        let reload = self.refresh_requested && self.fetch_state == FetchState::Loaded;
        if self.fetch_state != FetchState::Idle && !reload {
            tracing::debug!(state = ?self.fetch_state, "view already populated");
            return Ok(false);
        }
        tracing::debug!(server_key = %self.owner.server_key, reload, "populating view");
        self.fetch_state = FetchState::Loading;

        if self.engine.is_restored() && !self.refresh_requested {
            tracing::debug!(rows = self.engine.jobs().len(), "showing cached rows");
            self.pending_details = self.engine.detail_requests();
        } else {
            let event = match self.provider.fetch_rows(&self.owner).await {
                Ok(jobs) => Event::RowsFetched(jobs),
                Err(e) => Event::ProviderUnavailable(e.to_string()),
            };
            self.handle(event)?;
        }

        self.refresh_requested = false;
        self.fetch_state = FetchState::Loaded;
        self.load_histories().await;
        Ok(true)
    }

    /// Applies a host event and runs its synchronous follow-up actions.
    ///
    /// Detail requests are queued for [`load_histories`](Self::load_histories).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub fn handle(&mut self, event: Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.engine, event)?;
        for action in actions {
            match action {
                Action::LoadDetails(requests) => self.pending_details = requests,
                Action::ShowHistory { job_id, name } => {
                    tracing::debug!(job_id = %job_id, name = %name, "showing job history");
                    self.history_job = Some(job_id);
                }
                Action::Persist(state) => {
                    if let Err(e) = self.cache.put(&self.owner.server_key, state) {
                        tracing::warn!(error = %e, "cache write failed");
                    }
                }
            }
        }
        Ok(render)
    }

    /// Fetches the queued detail requests, failing rows first, applying each
    /// completion to the engine as it arrives.
    pub async fn load_histories(&mut self) -> LoadSummary {
        let requests = std::mem::take(&mut self.pending_details);
        if requests.is_empty() {
            return LoadSummary::default();
        }
        let token = self.engine.liveness();
        let batch_size = self.engine.settings().detail_batch_size;
        let engine = &mut self.engine;

        load_details(&self.provider, &self.owner, requests, batch_size, &token, |outcome| {
            if let Err(e) = handle_event(engine, Event::DetailLoaded(outcome)) {
                tracing::error!(error = %e, "detail completion rejected");
            }
        })
        .await
    }

    /// Retires the engine and stores its final state in the cache.
    pub fn teardown(&mut self) {
        if let Err(e) = self.handle(Event::Teardown) {
            tracing::warn!(error = %e, "teardown failed");
        }
    }
}
