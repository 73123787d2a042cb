//! Application layer: the tabular state engine and the event model around it.
//!
//! The engine owns the [`DataView`], the [`FilterStack`] and the
//! [`RowStyleCache`] and keeps them consistent; the handler translates host
//! events into engine calls and follow-up actions; the view drives one job
//! list instance against a provider and the cross-instance cache.
//!
//! ```text
//! host callback → Event → handle_event → TabularEngine → (render?, Actions)
//!                                              ↑                  ↓
//!                                              └── DetailLoaded ──┘
//! ```
//!
//! # Modules
//!
//! - [`data_view`]: item store, predicate and projection with detail rows
//! - [`filter_stack`]: per-column filter snapshots for undo
//! - [`style_cache`]: row class annotations keyed by filter snapshot
//! - [`sort`]: column comparators
//! - [`engine`]: the coordinating [`TabularEngine`]
//! - [`actions`]: follow-up actions and the table context menu
//! - [`handler`]: event dispatch
//! - [`view`]: provider-backed view lifecycle

pub mod actions;
pub mod data_view;
pub mod engine;
pub mod filter_stack;
pub mod handler;
pub mod sort;
pub mod style_cache;
pub mod view;

pub use actions::{table_actions, Action, JobAction, JobActionContext, MenuItem};
pub use data_view::{DataView, Projected, RowPredicate};
pub use engine::{EngineSettings, SortState, TabularEngine};
pub use filter_stack::{FilterSnapshot, FilterStack, SnapshotKey};
pub use handler::{handle_event, Event};
pub use sort::compare_rows;
pub use style_cache::{annotate, Annotations, RowClass, RowStyleCache, StyleAnnotation};
pub use view::{FetchState, JobListView};
