//! Positional row styling and its per-snapshot cache.
//!
//! Annotations are keyed by projection index, so they are only valid for the
//! projection they were computed from. [`annotate`] recomputes them from
//! scratch; [`RowStyleCache`] remembers the annotations produced for each
//! filter snapshot so that undoing a filter can reinstate them without a
//! recomputation when the projection comes back identical.

use super::data_view::{DataView, Projected};
use super::filter_stack::SnapshotKey;
use crate::domain::Column;
use std::collections::{BTreeMap, HashMap};

/// Visual class applied across a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowClass {
    /// A failing record that has a detail row beneath it.
    JobWithError,
    /// The detail row itself.
    ErrorRow,
}

impl RowClass {
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::JobWithError => "job-with-error",
            Self::ErrorRow => "error-row",
        }
    }
}

/// Style marker for one projection row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleAnnotation {
    pub class: RowClass,
}

impl StyleAnnotation {
    /// Field id to class name, for every annotated field.
    #[must_use]
    pub fn column_classes(&self) -> BTreeMap<&'static str, &'static str> {
        Column::annotated_fields()
            .into_iter()
            .map(|field| (field, self.class.css()))
            .collect()
    }
}

/// Projection index to annotation.
pub type Annotations = BTreeMap<usize, StyleAnnotation>;

/// Computes annotations for the view's current projection.
///
/// Every failing record followed by its detail row yields a
/// [`RowClass::JobWithError`] at its own index and a [`RowClass::ErrorRow`]
/// at the next.
#[must_use]
pub fn annotate(view: &DataView) -> Annotations {
    let mut annotations = Annotations::new();
    for (index, entry) in view.projected().into_iter().enumerate() {
        match entry {
            Projected::Record(row) if row.is_failing() && row.detail.is_some() => {
                annotations.insert(index, StyleAnnotation { class: RowClass::JobWithError });
            }
            Projected::Detail { .. } => {
                annotations.insert(index, StyleAnnotation { class: RowClass::ErrorRow });
            }
            Projected::Record(_) => {}
        }
    }
    annotations
}

#[derive(Debug, Clone, Default)]
pub struct RowStyleCache {
    current: Annotations,
    cached: HashMap<SnapshotKey, Annotations>,
    recomputations: u64,
}

impl RowStyleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations for the projection currently displayed.
    #[must_use]
    pub const fn current(&self) -> &Annotations {
        &self.current
    }

    /// Number of full recomputations since construction.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Recomputes the current annotations from `view`.
    pub fn recompute(&mut self, view: &DataView) -> &Annotations {
        self.current = annotate(view);
        self.recomputations += 1;
        tracing::debug!(
            annotated = self.current.len(),
            recomputations = self.recomputations,
            "row styles recomputed"
        );
        &self.current
    }

    /// Caches the current annotations under `key`.
    pub fn record(&mut self, key: SnapshotKey) {
        self.cached.insert(key, self.current.clone());
    }

    /// Reinstates the annotations cached for `key`.
    ///
    /// Returns `false`, leaving the current annotations untouched, when
    /// nothing was cached for it.
    pub fn restore(&mut self, key: SnapshotKey) -> bool {
        match self.cached.get(&key) {
            Some(annotations) => {
                self.current.clone_from(annotations);
                tracing::debug!(?key, annotated = self.current.len(), "row styles restored");
                true
            }
            None => false,
        }
    }

    /// Drops the cached sets of `column` at `depth` and above.
    pub fn forget_from(&mut self, column: Column, depth: usize) {
        self.cached.retain(|key, _| match *key {
            SnapshotKey::Filter { column: c, depth: d } => c != column || d < depth,
            SnapshotKey::Base => true,
        });
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.cached.clear();
    }
}
