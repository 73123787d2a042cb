//! Domain layer for the job grid.
//!
//! Core types independent of any rendering host: the error type, the column
//! catalogue, provider job records, and the grid row model.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`column`]: Column catalogue and sentinels
//! - [`job`]: Provider job records and value conversions
//! - [`row`]: Grid rows and their synthetic detail rows
//!
//! # Examples
//!
//! ```
//! use jobgrid::domain::{Column, Row, RunOutcome};
//!
//! let row = Row::new("job-1")
//!     .with_value(Column::Name, "nightly backup")
//!     .with_outcome(RunOutcome::Failed);
//! assert!(row.is_failing());
//! ```

pub mod column;
pub mod error;
pub mod job;
pub mod row;

pub use column::{Column, ColumnKind, NEVER_RUN, NOT_SCHEDULED};
pub use error::{GridError, Result};
pub use job::{JobDetail, JobHistory, JobInfo, JobSchedule, JobStep, RunOutcome};
pub use row::{DetailRow, DetailState, Row, RowId, DETAIL_SUFFIX};
