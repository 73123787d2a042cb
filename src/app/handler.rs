//! Event handling for the job grid.
//!
//! The rendering host reports what happened (rows arrived, the user changed a
//! filter, a detail fetch completed) as an [`Event`]. [`handle_event`]
//! applies it to the [`TabularEngine`] and answers with whether the grid must
//! be redrawn plus the [`Action`]s the host should run next.
//!
//! # Event Types
//!
//! - **Population**: `RowsFetched`, `ProviderUnavailable`
//! - **Interaction**: `FilterChanged`, `FilterCleared`, `SortRequested`,
//!   `RowActivated`
//! - **Async completion**: `DetailLoaded`
//! - **Lifecycle**: `Teardown`
//!
//! Failures of the provider or of a single detail fetch never surface as
//! errors here; they degrade to an empty grid or placeholder text.
//!
//! # Example
//!
//! ```
//! use jobgrid::app::{handle_event, Action, EngineSettings, Event, TabularEngine};
//! use jobgrid::storage::MemoryCache;
//!
//! let mut engine = TabularEngine::new("local", &MemoryCache::new(), EngineSettings::default());
//! let (render, actions) = handle_event(&mut engine, Event::RowsFetched(Vec::new()))?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::LoadDetails(requests)] if requests.is_empty()));
//! # Ok::<(), jobgrid::GridError>(())
//! ```

use super::actions::Action;
use super::engine::TabularEngine;
use crate::domain::{Column, GridError, JobInfo, Result};
use crate::worker::DetailOutcome;
use std::collections::BTreeSet;

/// Host-originated events.
///
/// Columns are named the way the host's headers name them: by display name
/// or field id.
#[derive(Debug)]
pub enum Event {
    /// The provider listed the server's jobs.
    RowsFetched(Vec<JobInfo>),

    /// The provider could not list jobs; the grid shows no rows.
    ProviderUnavailable(String),

    /// A column's filter menu was confirmed. An empty set undoes the
    /// column's most recent filter.
    FilterChanged {
        column: String,
        accepted: BTreeSet<String>,
    },

    /// A column's filter was cleared outright.
    FilterCleared { column: String },

    SortRequested { column: String, ascending: bool },

    /// A row was clicked, by projection index.
    RowActivated(usize),

    /// A detail fetch completed, successfully or not.
    DetailLoaded(DetailOutcome),

    /// The view is going away.
    Teardown,
}

impl Event {
    const fn kind(&self) -> &'static str {
        match self {
            Self::RowsFetched(_) => "rows_fetched",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::FilterChanged { .. } => "filter_changed",
            Self::FilterCleared { .. } => "filter_cleared",
            Self::SortRequested { .. } => "sort_requested",
            Self::RowActivated(_) => "row_activated",
            Self::DetailLoaded(_) => "detail_loaded",
            Self::Teardown => "teardown",
        }
    }
}

fn resolve_column(name: &str) -> Option<Column> {
    let column = Column::from_display_name(name);
    if column.is_none() {
        tracing::debug!(column = %name, "unknown column ignored");
    }
    column
}

/// Applies `event` to `engine`.
///
/// Returns whether a re-render is needed and the actions to run, in order.
///
/// # Errors
///
/// Returns an error only for failures that are not part of the grid's
/// degrade-gracefully contract. Stale detail completions are swallowed.
pub fn handle_event(engine: &mut TabularEngine, event: Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    match event {
        Event::RowsFetched(jobs) => {
            engine.populate(jobs);
            engine.expand(true);
            Ok((true, vec![Action::LoadDetails(engine.detail_requests())]))
        }
        Event::ProviderUnavailable(reason) => {
            tracing::warn!(reason = %reason, "job provider unavailable, showing no rows");
            engine.populate(Vec::new());
            engine.expand(true);
            Ok((true, vec![]))
        }
        Event::FilterChanged { column, accepted } => {
            let Some(column) = resolve_column(&column) else {
                return Ok((false, vec![]));
            };
            Ok((engine.apply_filter(column, accepted), vec![]))
        }
        Event::FilterCleared { column } => {
            let Some(column) = resolve_column(&column) else {
                return Ok((false, vec![]));
            };
            Ok((engine.clear_filter(column), vec![]))
        }
        Event::SortRequested { column, ascending } => {
            let Some(column) = resolve_column(&column) else {
                return Ok((false, vec![]));
            };
            Ok((engine.sort(column, ascending), vec![]))
        }
        Event::RowActivated(index) => {
            let actions = engine
                .row_activated(index)
                .map(|job| Action::ShowHistory {
                    job_id: job.job_id.clone(),
                    name: job.name.clone(),
                })
                .into_iter()
                .collect();
            Ok((false, actions))
        }
        Event::DetailLoaded(outcome) => match engine.apply_detail(outcome) {
            Ok(changed) => Ok((changed, vec![])),
            Err(GridError::StaleCompletion { row_id }) => {
                tracing::debug!(row_id = %row_id, "stale detail completion discarded");
                Ok((false, vec![]))
            }
            Err(e) => Err(e),
        },
        Event::Teardown => {
            let actions = engine.retire().map(Action::Persist).into_iter().collect();
            Ok((false, actions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineSettings;
    use crate::domain::RowId;
    use crate::storage::MemoryCache;

    fn jobs() -> Vec<JobInfo> {
        serde_json::from_str(
            r#"[
                {"jobId":"a","name":"alpha","lastRunOutcome":0},
                {"jobId":"b","name":"bravo","lastRunOutcome":1}
            ]"#,
        )
        .unwrap()
    }

    fn engine() -> TabularEngine {
        let mut engine = TabularEngine::new("srv", &MemoryCache::new(), EngineSettings::default());
        handle_event(&mut engine, Event::RowsFetched(jobs())).unwrap();
        engine
    }

    #[test]
    fn rows_fetched_expands_and_requests_details() {
        let mut engine = TabularEngine::new("srv", &MemoryCache::new(), EngineSettings::default());
        let (render, actions) = handle_event(&mut engine, Event::RowsFetched(jobs())).unwrap();
        assert!(render);
        assert_eq!(engine.projection_ids().len(), 3);
        let [Action::LoadDetails(requests)] = actions.as_slice() else {
            panic!("expected a single LoadDetails action");
        };
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].row_id, RowId::new("a"));
    }

    #[test]
    fn provider_unavailable_shows_empty_grid() {
        let mut engine = engine();
        let (render, actions) =
            handle_event(&mut engine, Event::ProviderUnavailable("offline".into())).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert!(engine.projection_ids().is_empty());
    }

    #[test]
    fn filter_events_resolve_display_names() {
        let mut engine = engine();
        let accepted: BTreeSet<String> = ["Succeeded".to_string()].into();
        let (render, _) = handle_event(
            &mut engine,
            Event::FilterChanged {
                column: "Last Run Outcome".into(),
                accepted,
            },
        )
        .unwrap();
        assert!(render);
        assert_eq!(engine.projection_ids(), [RowId::new("b")]);

        let (render, _) = handle_event(
            &mut engine,
            Event::FilterCleared {
                column: "Owner".into(),
            },
        )
        .unwrap();
        assert!(!render);
    }

    #[test]
    fn activating_a_detail_row_shows_parent_history() {
        let mut engine = engine();
        let (render, actions) = handle_event(&mut engine, Event::RowActivated(1)).unwrap();
        assert!(!render);
        assert_eq!(
            actions,
            [Action::ShowHistory {
                job_id: "a".into(),
                name: "alpha".into()
            }]
        );
        let (_, actions) = handle_event(&mut engine, Event::RowActivated(42)).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn teardown_then_late_detail_is_silent() {
        let mut engine = engine();
        let (_, actions) = handle_event(&mut engine, Event::Teardown).unwrap();
        assert!(matches!(actions.as_slice(), [Action::Persist(state)] if state.rows.len() == 2));

        let late = DetailOutcome::failed(RowId::new("a"), "late");
        let (render, actions) = handle_event(&mut engine, Event::DetailLoaded(late)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());

        let (_, actions) = handle_event(&mut engine, Event::Teardown).unwrap();
        assert!(actions.is_empty());
    }
}
