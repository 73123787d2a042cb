//! Follow-up work and row actions.
//!
//! [`Action`] is what the event handler asks its host to do after an event
//! has been applied to the engine: start history loading, show a job's
//! history, or store a retired engine's state. The host executes actions in
//! order.
//!
//! [`table_actions`] builds the per-row action menu from a
//! [`JobActionContext`].
//!
//! # Example
//!
//! ```
//! use jobgrid::app::{table_actions, JobAction, JobActionContext};
//! use jobgrid::domain::JobInfo;
//!
//! let job: JobInfo = serde_json::from_str(r#"{"jobId":"a","name":"backup"}"#)?;
//! let ctx = JobActionContext::new(job, None, None);
//! let edit = table_actions(&ctx).into_iter().find(|a| a.action == JobAction::Edit);
//! assert!(edit.is_some_and(|a| !a.enabled));
//! # Ok::<(), jobgrid::GridError>(())
//! ```

use crate::domain::{JobInfo, JobSchedule, JobStep};
use crate::storage::CachedState;
use crate::worker::DetailRequest;

/// Side effects requested by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetches details for these rows and feeds each completion back as
    /// [`Event::DetailLoaded`](super::Event::DetailLoaded).
    LoadDetails(Vec<DetailRequest>),

    /// Shows the run history of a job.
    ShowHistory {
        job_id: String,
        name: String,
    },

    /// Stores the final state of a retired engine in the cross-instance cache.
    Persist(CachedState),
}

/// Everything the row action menu needs to know about a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobActionContext {
    pub job: JobInfo,
    /// `None` until the job's detail has been fetched.
    pub steps: Option<Vec<JobStep>>,
    pub schedules: Option<Vec<JobSchedule>>,
    /// Editing needs both steps and schedules loaded.
    pub can_edit: bool,
}

impl JobActionContext {
    #[must_use]
    pub fn new(job: JobInfo, steps: Option<Vec<JobStep>>, schedules: Option<Vec<JobSchedule>>) -> Self {
        let can_edit = steps.is_some() && schedules.is_some();
        Self {
            job,
            steps,
            schedules,
            can_edit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobAction {
    Run,
    Edit,
    Delete,
}

impl JobAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Run => "Run",
            Self::Edit => "Edit Job",
            Self::Delete => "Delete Job",
        }
    }
}

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub action: JobAction,
    pub enabled: bool,
}

/// Action menu for a row: Run, Edit (only when editable), Delete.
#[must_use]
pub fn table_actions(ctx: &JobActionContext) -> Vec<MenuItem> {
    vec![
        MenuItem {
            action: JobAction::Run,
            enabled: true,
        },
        MenuItem {
            action: JobAction::Edit,
            enabled: ctx.can_edit,
        },
        MenuItem {
            action: JobAction::Delete,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobInfo {
        serde_json::from_str(r#"{"jobId":"j","name":"nightly"}"#).unwrap()
    }

    #[test]
    fn edit_needs_steps_and_schedules() {
        assert!(!JobActionContext::new(job(), Some(Vec::new()), None).can_edit);
        assert!(!JobActionContext::new(job(), None, Some(Vec::new())).can_edit);
        assert!(JobActionContext::new(job(), Some(Vec::new()), Some(Vec::new())).can_edit);
    }

    #[test]
    fn menu_order_is_fixed() {
        let ctx = JobActionContext::new(job(), Some(Vec::new()), Some(Vec::new()));
        let menu = table_actions(&ctx);
        let labels: Vec<&str> = menu.iter().map(|m| m.action.label()).collect();
        assert_eq!(labels, ["Run", "Edit Job", "Delete Job"]);
        assert!(menu.iter().all(|m| m.enabled));
    }
}
