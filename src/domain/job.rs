//! Job records as delivered by a job provider.
//!
//! These mirror the provider's wire shape (camelCase JSON with numeric status
//! codes). The conversion helpers turn raw values into the display strings the
//! grid filters and sorts on.

use super::column::{NEVER_RUN, NOT_SCHEDULED};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date the provider reports for "no date".
const EMPTY_PROVIDER_DATE: &str = "1/1/0001";

/// Outcome of a job's most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    Failed,
    Succeeded,
    Retry,
    Cancelled,
    InProgress,
    Unknown,
}

impl RunOutcome {
    /// Maps a provider outcome code to an outcome.
    ///
    /// # Example
    ///
    /// ```
    /// use jobgrid::domain::RunOutcome;
    ///
    /// assert_eq!(RunOutcome::from_code(0), RunOutcome::Failed);
    /// assert_eq!(RunOutcome::from_code(1), RunOutcome::Succeeded);
    /// assert_eq!(RunOutcome::from_code(42), RunOutcome::Unknown);
    /// ```
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Failed,
            1 => Self::Succeeded,
            2 => Self::Retry,
            3 => Self::Cancelled,
            4 => Self::InProgress,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Retry => "Retry",
            Self::Cancelled => "Cancelled",
            Self::InProgress => "In Progress",
            Self::Unknown => "Status Unknown",
        }
    }

    /// Class of the small status marker drawn beside the job name.
    #[must_use]
    pub const fn indicator_class(self) -> &'static str {
        match self {
            Self::Succeeded => "jobview-jobnameindicatorsuccess",
            Self::Cancelled => "jobview-jobnameindicatorcancel",
            Self::Unknown => "jobview-jobnameindicatorunknown",
            Self::Failed | Self::Retry | Self::InProgress => "jobview-jobnameindicatorfailure",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Converts a provider execution status code to its label.
#[must_use]
pub const fn execution_status_label(code: i32) -> &'static str {
    match code {
        1 => "Executing",
        2 => "Waiting for Thread",
        3 => "Between Retries",
        4 => "Idle",
        5 => "Suspended",
        6 => "[Obsolete]",
        7 => "Performing Completion Actions",
        _ => "Status Unknown",
    }
}

/// Converts a provider last-run date, mapping the empty date to [`NEVER_RUN`].
#[must_use]
pub fn last_run_label(date: &str) -> String {
    if date.is_empty() || date.contains(EMPTY_PROVIDER_DATE) {
        NEVER_RUN.to_string()
    } else {
        date.to_string()
    }
}

/// Converts a provider next-run date, mapping the empty date to [`NOT_SCHEDULED`].
#[must_use]
pub fn next_run_label(date: &str) -> String {
    if date.is_empty() || date.contains(EMPTY_PROVIDER_DATE) {
        NOT_SCHEDULED.to_string()
    } else {
        date.to_string()
    }
}

#[must_use]
pub const fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Parses an `HH:MM:SS` run duration into seconds.
///
/// Missing or malformed parts count as zero, as does a total that does not
/// fit in a `u64`.
///
/// # Example
///
/// ```
/// use jobgrid::domain::job::duration_to_seconds;
///
/// assert_eq!(duration_to_seconds("01:02:03"), 3723);
/// assert_eq!(duration_to_seconds("00:00:07"), 7);
/// assert_eq!(duration_to_seconds("garbage"), 0);
/// ```
#[must_use]
pub fn duration_to_seconds(duration: &str) -> u64 {
    let parts: Vec<u64> = duration
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().unwrap_or(0))
        .collect();

    let total = match parts.as_slice() {
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*s)),
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        [s] => Some(*s),
        _ => None,
    };
    total.unwrap_or(0)
}

/// A job as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub job_id: String,
    pub name: String,
    #[serde(default)]
    pub target_database: String,
    #[serde(default)]
    pub last_run: String,
    #[serde(default)]
    pub next_run: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub current_execution_status: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub runnable: bool,
    #[serde(default)]
    pub has_schedule: bool,
    /// Provider outcome code, see [`RunOutcome::from_code`].
    #[serde(default = "unknown_outcome_code")]
    pub last_run_outcome: i32,
}

const fn unknown_outcome_code() -> i32 {
    5
}

impl JobInfo {
    #[must_use]
    pub const fn outcome(&self) -> RunOutcome {
        RunOutcome::from_code(self.last_run_outcome)
    }

    #[must_use]
    pub const fn is_failing(&self) -> bool {
        matches!(self.outcome(), RunOutcome::Failed)
    }
}

/// One step of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStep {
    pub step_id: String,
    pub step_name: String,
}

/// A schedule attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSchedule {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub is_enabled: bool,
}

/// One past run of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistory {
    /// Provider outcome code of the run; 0 means failed.
    pub run_status: i32,
    /// `HH:MM:SS`.
    #[serde(default)]
    pub run_duration: String,
    #[serde(default)]
    pub run_date: String,
    #[serde(default)]
    pub message: String,
}

impl JobHistory {
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.run_status == 0
    }
}

/// Steps, schedules and run history of a single job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(default)]
    pub steps: Vec<JobStep>,
    #[serde(default)]
    pub schedules: Vec<JobSchedule>,
    #[serde(default)]
    pub histories: Vec<JobHistory>,
}
