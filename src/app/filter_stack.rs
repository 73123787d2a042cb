//! Ordered record of active column filters.
//!
//! Each filtered column keeps an append-only list of snapshots: the accepted
//! value set that was applied and the projection it produced. Removing a
//! filter undoes the column's most recent snapshot; the most recently pushed
//! snapshot still standing (else the base snapshot taken at population time)
//! describes what the grid should look like afterwards.

use crate::domain::{Column, Row, RowId};
use std::collections::{BTreeSet, HashMap};

/// Identifies a snapshot for annotation caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    /// The unfiltered projection recorded when rows were populated.
    Base,
    /// `depth`-th snapshot (zero based) of a column.
    Filter { column: Column, depth: usize },
}

impl SnapshotKey {
    #[must_use]
    pub fn column(self) -> Option<Column> {
        match self {
            Self::Base => None,
            Self::Filter { column, .. } => Some(column),
        }
    }
}

/// An applied value set together with the projection it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSnapshot {
    pub accepted: BTreeSet<String>,
    pub rows: Vec<RowId>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterStack {
    order: Vec<Column>,
    entries: HashMap<Column, Vec<FilterSnapshot>>,
    /// Live snapshot keys in push order.
    pushes: Vec<SnapshotKey>,
    base: Option<FilterSnapshot>,
}

impl FilterStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the unfiltered projection.
    pub fn set_base(&mut self, rows: Vec<RowId>) {
        self.base = Some(FilterSnapshot {
            accepted: BTreeSet::new(),
            rows,
        });
    }

    #[must_use]
    pub const fn base(&self) -> Option<&FilterSnapshot> {
        self.base.as_ref()
    }

    /// Accepted values of the column's most recent snapshot.
    #[must_use]
    pub fn accepted(&self, column: Column) -> Option<&BTreeSet<String>> {
        self.entries
            .get(&column)
            .and_then(|snapshots| snapshots.last())
            .map(|s| &s.accepted)
    }

    /// Active columns in the order they were first filtered.
    #[must_use]
    pub fn active_columns(&self) -> &[Column] {
        &self.order
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn depth(&self, column: Column) -> usize {
        self.entries.get(&column).map_or(0, Vec::len)
    }

    /// Whether `row` passes every active filter other than `except`.
    #[must_use]
    pub fn check_previous_filters(&self, row: &Row, except: Option<Column>) -> bool {
        self.order
            .iter()
            .filter(|column| Some(**column) != except)
            .all(|column| self.row_matches(row, *column))
    }

    /// Whether `row` passes every active filter.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.check_previous_filters(row, None)
    }

    fn row_matches(&self, row: &Row, column: Column) -> bool {
        self.accepted(column).map_or(true, |accepted| {
            accepted.is_empty() || row.value(column).is_some_and(|v| accepted.contains(v))
        })
    }

    /// Builds a standalone predicate over the current accepted sets.
    #[must_use]
    pub fn predicate(&self) -> impl Fn(&Row) -> bool + Send + Sync + 'static {
        let filters: Vec<(Column, BTreeSet<String>)> = self
            .order
            .iter()
            .filter_map(|column| self.accepted(*column).map(|set| (*column, set.clone())))
            .filter(|(_, set)| !set.is_empty())
            .collect();

        move |row: &Row| {
            filters
                .iter()
                .all(|(column, set)| row.value(*column).is_some_and(|v| set.contains(v)))
        }
    }

    /// Pushes a snapshot for `column`.
    ///
    /// Scans every row in `rows` (the full, unfiltered list in display
    /// order) and keeps those whose value is accepted and which satisfy all
    /// other active filters. Detail rows follow their parents.
    pub fn push(&mut self, column: Column, accepted: BTreeSet<String>, rows: &[Row]) -> SnapshotKey {
        let mut passing = Vec::new();
        for row in rows {
            let accepted_here = row.value(column).is_some_and(|v| accepted.contains(v));
            if accepted_here && self.check_previous_filters(row, Some(column)) {
                passing.push(row.id.clone());
                if let Some(detail) = &row.detail {
                    passing.push(detail.id.clone());
                }
            }
        }

        if !self.order.contains(&column) {
            self.order.push(column);
        }
        let snapshots = self.entries.entry(column).or_default();
        snapshots.push(FilterSnapshot {
            accepted,
            rows: passing,
        });

        let key = SnapshotKey::Filter {
            column,
            depth: snapshots.len() - 1,
        };
        self.pushes.push(key);
        tracing::debug!(?key, "filter snapshot pushed");
        key
    }

    /// Pops the column's most recent snapshot.
    ///
    /// Returns `None` when the column has no active filter. When the last
    /// snapshot of a column is popped the column leaves the stack.
    pub fn pop(&mut self, column: Column) -> Option<(SnapshotKey, FilterSnapshot)> {
        let snapshots = self.entries.get_mut(&column)?;
        let snapshot = snapshots.pop()?;
        let key = SnapshotKey::Filter {
            column,
            depth: snapshots.len(),
        };
        if snapshots.is_empty() {
            self.entries.remove(&column);
            self.order.retain(|c| *c != column);
        }
        self.pushes.retain(|k| *k != key);
        Some((key, snapshot))
    }

    /// Drops every snapshot of the column. Returns the removed keys.
    pub fn clear(&mut self, column: Column) -> Vec<SnapshotKey> {
        let Some(snapshots) = self.entries.remove(&column) else {
            return Vec::new();
        };
        self.order.retain(|c| *c != column);
        self.pushes.retain(|k| k.column() != Some(column));
        (0..snapshots.len())
            .map(|depth| SnapshotKey::Filter { column, depth })
            .collect()
    }

    /// The snapshot describing the current filter state.
    ///
    /// The most recently pushed snapshot still standing, else the base.
    #[must_use]
    pub fn top(&self) -> Option<(SnapshotKey, &FilterSnapshot)> {
        if let Some(&key) = self.pushes.last() {
            let SnapshotKey::Filter { column, depth } = key else {
                return None;
            };
            return self.entries.get(&column)?.get(depth).map(|s| (key, s));
        }
        self.base.as_ref().map(|s| (SnapshotKey::Base, s))
    }

    /// Replaces the rows recorded for `key`, after a recomputation.
    pub fn rebase(&mut self, key: SnapshotKey, rows: Vec<RowId>) {
        match key {
            SnapshotKey::Base => self.set_base(rows),
            SnapshotKey::Filter { column, depth } => {
                if let Some(snapshot) = self.entries.get_mut(&column).and_then(|s| s.get_mut(depth)) {
                    snapshot.rows = rows;
                }
            }
        }
    }

    /// Drops all filters and the base snapshot.
    pub fn reset(&mut self) {
        self.order.clear();
        self.entries.clear();
        self.pushes.clear();
        self.base = None;
    }
}
