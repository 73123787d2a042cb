//! Canonical row list and its filtered projection.
//!
//! [`DataView`] owns the rows in their current order, an optional row
//! predicate, and the projection computed by [`DataView::refresh`]: the ids of
//! every row that passes the predicate, each immediately followed by its
//! detail row when it has one. Detail rows are never filtered or sorted on
//! their own; they travel with their parent.

use crate::domain::{DetailRow, Row, RowId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Row predicate installed with [`DataView::set_filter`].
pub type RowPredicate = Box<dyn Fn(&Row) -> bool + Send + Sync>;

/// One entry of the projection.
#[derive(Debug, Clone, Copy)]
pub enum Projected<'a> {
    Record(&'a Row),
    Detail { parent: &'a Row, detail: &'a DetailRow },
}

impl<'a> Projected<'a> {
    #[must_use]
    pub fn id(&self) -> &'a RowId {
        match *self {
            Self::Record(row) => &row.id,
            Self::Detail { detail, .. } => &detail.id,
        }
    }

    /// The record itself, or the parent of a detail row.
    #[must_use]
    pub const fn record(&self) -> &'a Row {
        match *self {
            Self::Record(row) | Self::Detail { parent: row, .. } => row,
        }
    }

    #[must_use]
    pub const fn is_detail(&self) -> bool {
        matches!(self, Self::Detail { .. })
    }
}

/// What a projection position was built from. A record id may itself end
/// in the detail suffix, so entries are never classified by id.
#[derive(Debug, Clone)]
enum Slot {
    Record,
    Detail { parent: RowId },
}

#[derive(Default)]
pub struct DataView {
    items: Vec<Row>,
    positions: HashMap<RowId, usize>,
    /// Detail id to parent id, rebuilt whenever details change.
    detail_parents: HashMap<RowId, RowId>,
    filter: Option<RowPredicate>,
    projection: Vec<RowId>,
    slots: Vec<Slot>,
    revision: u64,
}

impl fmt::Debug for DataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataView")
            .field("items", &self.items.len())
            .field("filtered", &self.filter.is_some())
            .field("projection", &self.projection.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl DataView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the row list. The installed filter is kept.
    ///
    /// Call [`refresh`](Self::refresh) before reading the projection.
    pub fn set_items(&mut self, rows: Vec<Row>) {
        tracing::debug!(count = rows.len(), "data view items replaced");
        self.items = rows;
        self.reindex();
    }

    pub fn set_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Stable sort of the records; detail rows follow their parents.
    pub fn sort<F>(&mut self, compare: F, ascending: bool)
    where
        F: Fn(&Row, &Row) -> Ordering,
    {
        self.items.sort_by(|a, b| {
            let ordering = compare(a, b);
            if ascending { ordering } else { ordering.reverse() }
        });
        self.reindex();
    }

    /// Recomputes the projection from the rows and the installed filter.
    pub fn refresh(&mut self) {
        let capacity = self.items.len() + self.detail_parents.len();
        let mut projection = Vec::with_capacity(capacity);
        let mut slots = Vec::with_capacity(capacity);
        for row in self.items.iter().filter(|row| self.passes(row)) {
            projection.push(row.id.clone());
            slots.push(Slot::Record);
            if let Some(detail) = &row.detail {
                projection.push(detail.id.clone());
                slots.push(Slot::Detail { parent: row.id.clone() });
            }
        }
        self.projection = projection;
        self.slots = slots;
        self.revision += 1;
        tracing::trace!(
            visible = self.projection.len(),
            revision = self.revision,
            "data view refreshed"
        );
    }

    fn passes(&self, row: &Row) -> bool {
        self.filter.as_ref().map_or(true, |predicate| predicate(row))
    }

    fn reindex(&mut self) {
        self.positions = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.id.clone(), idx))
            .collect();
        self.rebuild_detail_parents();
    }

    fn rebuild_detail_parents(&mut self) {
        self.detail_parents = self
            .items
            .iter()
            .filter_map(|row| row.detail.as_ref().map(|d| (d.id.clone(), row.id.clone())))
            .collect();
    }

    /// All records in current order, ignoring the filter.
    #[must_use]
    pub fn items(&self) -> &[Row] {
        &self.items
    }

    /// Records passing the installed filter, in current order.
    #[must_use]
    pub fn filtered_items(&self) -> Vec<&Row> {
        self.items.iter().filter(|row| self.passes(row)).collect()
    }

    /// Ids of the visible rows, detail rows included.
    #[must_use]
    pub fn projection(&self) -> &[RowId] {
        &self.projection
    }

    /// Incremented by every [`refresh`](Self::refresh).
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projection.is_empty()
    }

    #[must_use]
    pub fn item_by_id(&self, id: &RowId) -> Option<&Row> {
        self.positions.get(id).and_then(|&idx| self.items.get(idx))
    }

    pub fn item_by_id_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        match self.positions.get(id) {
            Some(&idx) => self.items.get_mut(idx),
            None => None,
        }
    }

    /// Parent of a materialized detail row.
    #[must_use]
    pub fn parent_of(&self, detail_id: &RowId) -> Option<&RowId> {
        self.detail_parents.get(detail_id)
    }

    /// Projection entry at a visible position.
    #[must_use]
    pub fn entry_at(&self, index: usize) -> Option<Projected<'_>> {
        match self.slots.get(index)? {
            Slot::Record => self.item_by_id(self.projection.get(index)?).map(Projected::Record),
            Slot::Detail { parent } => {
                let parent = self.item_by_id(parent)?;
                let detail = parent.detail.as_ref()?;
                Some(Projected::Detail { parent, detail })
            }
        }
    }

    /// The full projection resolved to rows.
    #[must_use]
    pub fn projected(&self) -> Vec<Projected<'_>> {
        (0..self.projection.len()).filter_map(|idx| self.entry_at(idx)).collect()
    }

    /// Gives `row_id` a detail row unless it already has one.
    ///
    /// Returns `true` when a detail row was synthesized.
    pub fn attach_detail(&mut self, row_id: &RowId, detail: DetailRow) -> bool {
        let Some(row) = self.item_by_id_mut(row_id) else {
            return false;
        };
        if row.detail.is_some() {
            return false;
        }
        row.detail = Some(detail);
        self.rebuild_detail_parents();
        true
    }

    /// Updates an existing detail row in place.
    ///
    /// The projection is unaffected because ids do not change.
    pub fn update_detail<F>(&mut self, row_id: &RowId, update: F) -> bool
    where
        F: FnOnce(&mut DetailRow),
    {
        match self.item_by_id_mut(row_id).and_then(|row| row.detail.as_mut()) {
            Some(detail) => {
                update(detail);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, RunOutcome};

    fn rows() -> Vec<Row> {
        vec![
            Row::new("a").with_value(Column::Name, "charlie").with_outcome(RunOutcome::Failed),
            Row::new("b").with_value(Column::Name, "alpha").with_outcome(RunOutcome::Succeeded),
            Row::new("c").with_value(Column::Name, "bravo").with_outcome(RunOutcome::Succeeded),
        ]
    }

    fn ids(view: &DataView) -> Vec<&str> {
        view.projection().iter().map(RowId::as_str).collect()
    }

    #[test]
    fn projection_follows_insertion_order() {
        let mut view = DataView::new();
        view.set_items(rows());
        view.refresh();
        assert_eq!(ids(&view), ["a", "b", "c"]);
    }

    #[test]
    fn detail_rows_follow_parents_through_filter_and_sort() {
        let mut view = DataView::new();
        view.set_items(rows());
        let a = RowId::new("a");
        assert!(view.attach_detail(&a, DetailRow::loading(&a, "Loading Error...")));
        assert!(!view.attach_detail(&a, DetailRow::loading(&a, "again")));

        view.sort(|x, y| x.name().cmp(y.name()), true);
        view.refresh();
        assert_eq!(ids(&view), ["b", "c", "a", "a.error"]);

        view.set_filter(|row| row.name() != "bravo");
        view.refresh();
        assert_eq!(ids(&view), ["b", "a", "a.error"]);
        assert_eq!(view.parent_of(&RowId::new("a.error")), Some(&a));
        assert!(view.entry_at(2).is_some_and(|e| e.is_detail() && e.record().id == a));
    }

    #[test]
    fn set_items_keeps_the_filter() {
        let mut view = DataView::new();
        view.set_filter(|row| row.is_failing());
        view.set_items(rows());
        view.refresh();
        assert_eq!(ids(&view), ["a"]);
        assert_eq!(view.items().len(), 3);
        assert_eq!(view.filtered_items().len(), 1);
    }

    #[test]
    fn descending_sort_is_stable() {
        let mut view = DataView::new();
        view.set_items(rows());
        view.sort(|x, y| x.is_failing().cmp(&y.is_failing()), false);
        view.refresh();
        assert_eq!(ids(&view), ["a", "b", "c"]);
    }

    #[test]
    fn record_named_like_a_detail_stays_a_record() {
        let mut view = DataView::new();
        view.set_items(vec![
            Row::new("a").with_outcome(RunOutcome::Failed),
            Row::new("a.error").with_outcome(RunOutcome::Succeeded),
        ]);
        let a = RowId::new("a");
        view.attach_detail(&a, DetailRow::loading(&a, "Loading Error..."));
        view.refresh();

        assert_eq!(ids(&view), ["a", "a.error", "a.error"]);
        let kinds: Vec<bool> = view.projected().iter().map(Projected::is_detail).collect();
        assert_eq!(kinds, [false, true, false]);
        assert!(view.entry_at(2).is_some_and(|e| !e.record().is_failing()));
    }

    #[test]
    fn refresh_bumps_revision() {
        let mut view = DataView::new();
        view.refresh();
        view.refresh();
        assert_eq!(view.revision(), 2);
    }
}
