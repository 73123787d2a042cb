//! Detail fetch requests and their outcomes.
//!
//! The engine hands out [`DetailRequest`]s, the loader turns each into one
//! provider call, and every completion comes back as a [`DetailOutcome`] that
//! the engine applies as soon as it arrives.

use crate::domain::{GridError, JobDetail, Result, RowId};

/// Loading priority of a detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Rows whose last run failed; their detail rows are waiting on this.
    Failing,
    Passing,
}

/// One detail fetch to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub row_id: RowId,
    /// Display label of the row (the job name).
    pub label: String,
    /// Grouping key the provider needs alongside the id (the target database).
    pub group_key: String,
    pub priority: Priority,
}

/// A completed detail fetch.
#[derive(Debug)]
pub struct DetailOutcome {
    pub row_id: RowId,
    pub result: Result<JobDetail>,
}

impl DetailOutcome {
    #[must_use]
    pub const fn loaded(row_id: RowId, detail: JobDetail) -> Self {
        Self { row_id, result: Ok(detail) }
    }

    pub fn failed(row_id: RowId, message: impl Into<String>) -> Self {
        let message = message.into();
        let result = Err(GridError::DetailFetchFailed {
            row_id: row_id.to_string(),
            message,
        });
        Self { row_id, result }
    }
}

/// Splits requests into the failing group and the passing group.
#[must_use]
pub fn partition(requests: Vec<DetailRequest>) -> (Vec<DetailRequest>, Vec<DetailRequest>) {
    requests.into_iter().partition(|r| r.priority == Priority::Failing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, priority: Priority) -> DetailRequest {
        DetailRequest {
            row_id: RowId::new(id),
            label: id.to_uppercase(),
            group_key: "master".to_string(),
            priority,
        }
    }

    #[test]
    fn partition_keeps_relative_order() {
        let (failing, passing) = partition(vec![
            request("a", Priority::Passing),
            request("b", Priority::Failing),
            request("c", Priority::Passing),
            request("d", Priority::Failing),
        ]);
        let ids = |v: &[DetailRequest]| v.iter().map(|r| r.row_id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&failing), ["b", "d"]);
        assert_eq!(ids(&passing), ["a", "c"]);
    }

    #[test]
    fn failed_outcome_carries_the_row() {
        let outcome = DetailOutcome::failed(RowId::new("x"), "boom");
        assert!(matches!(
            outcome.result,
            Err(GridError::DetailFetchFailed { ref row_id, .. }) if row_id == "x"
        ));
    }
}
