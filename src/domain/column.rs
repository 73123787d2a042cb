//! Column catalogue for the job list grid.
//!
//! Every visible column has a display name (what the host's header filter and
//! sort callbacks report), a field id (the key used in style annotations), and
//! a [`ColumnKind`] that selects its comparator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel shown in the Last Run column for jobs that never ran.
pub const NEVER_RUN: &str = "Never Run";

/// Sentinel shown in the Next Run column for jobs without a schedule.
pub const NOT_SCHEDULED: &str = "Not Scheduled";

/// Field id of the expander column the grid prepends to every row.
pub const DETAIL_SELECTOR_FIELD: &str = "_detail_selector";

/// How a column's values are compared when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, compared case-insensitively.
    Text,
    /// A date rendered as text, where `sentinel` marks "no date".
    Date {
        /// Column specific "no date" marker.
        sentinel: &'static str,
    },
    /// Rendered chart, neither sortable nor filterable.
    Chart,
}

/// A column of the job list grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Name,
    TargetDatabase,
    LastRun,
    NextRun,
    Enabled,
    Status,
    Category,
    Runnable,
    Schedule,
    LastRunOutcome,
    PreviousRuns,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Self; 11] = [
        Self::Name,
        Self::TargetDatabase,
        Self::LastRun,
        Self::NextRun,
        Self::Enabled,
        Self::Status,
        Self::Category,
        Self::Runnable,
        Self::Schedule,
        Self::LastRunOutcome,
        Self::PreviousRuns,
    ];

    /// Header text of the column.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::TargetDatabase => "Target Database",
            Self::LastRun => "Last Run",
            Self::NextRun => "Next Run",
            Self::Enabled => "Enabled",
            Self::Status => "Status",
            Self::Category => "Category",
            Self::Runnable => "Runnable",
            Self::Schedule => "Schedule",
            Self::LastRunOutcome => "Last Run Outcome",
            Self::PreviousRuns => "Previous Runs",
        }
    }

    /// Field id used by row values and style annotations.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TargetDatabase => "targetDatabase",
            Self::LastRun => "lastRun",
            Self::NextRun => "nextRun",
            Self::Enabled => "enabled",
            Self::Status => "currentExecutionStatus",
            Self::Category => "category",
            Self::Runnable => "runnable",
            Self::Schedule => "hasSchedule",
            Self::LastRunOutcome => "lastRunOutcome",
            Self::PreviousRuns => "previousRuns",
        }
    }

    #[must_use]
    pub const fn kind(self) -> ColumnKind {
        match self {
            Self::LastRun => ColumnKind::Date { sentinel: NEVER_RUN },
            Self::NextRun => ColumnKind::Date { sentinel: NOT_SCHEDULED },
            Self::PreviousRuns => ColumnKind::Chart,
            _ => ColumnKind::Text,
        }
    }

    /// Whether the column takes part in sorting and filtering.
    #[must_use]
    pub const fn is_data(self) -> bool {
        !matches!(self.kind(), ColumnKind::Chart)
    }

    /// Resolves a header display name back to its column.
    ///
    /// # Example
    ///
    /// ```
    /// use jobgrid::domain::Column;
    ///
    /// assert_eq!(Column::from_display_name("Last Run"), Some(Column::LastRun));
    /// assert_eq!(Column::from_display_name("last run outcome"), Some(Column::LastRunOutcome));
    /// assert_eq!(Column::from_display_name("Owner"), None);
    /// ```
    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name) || c.field().eq_ignore_ascii_case(name))
    }

    /// Field ids that carry a style class when a row is annotated.
    ///
    /// Covers the expander column, the identity columns, and every visible
    /// column, so an annotated row is styled edge to edge.
    #[must_use]
    pub fn annotated_fields() -> Vec<&'static str> {
        let mut fields = vec![DETAIL_SELECTOR_FIELD, "id", "jobId"];
        fields.extend(
            Self::ALL
                .into_iter()
                .filter(|c| *c != Self::Category && *c != Self::Runnable)
                .map(Self::field),
        );
        fields
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_display_name(column.display_name()), Some(column));
        }
    }

    #[test]
    fn field_ids_resolve_too() {
        assert_eq!(Column::from_display_name("currentExecutionStatus"), Some(Column::Status));
        assert_eq!(Column::from_display_name("hasSchedule"), Some(Column::Schedule));
    }

    #[test]
    fn date_columns_carry_their_own_sentinel() {
        assert_eq!(Column::LastRun.kind(), ColumnKind::Date { sentinel: NEVER_RUN });
        assert_eq!(Column::NextRun.kind(), ColumnKind::Date { sentinel: NOT_SCHEDULED });
        assert!(!Column::PreviousRuns.is_data());
    }

    #[test]
    fn annotated_fields_start_with_the_expander() {
        let fields = Column::annotated_fields();
        assert_eq!(fields[0], DETAIL_SELECTOR_FIELD);
        assert!(fields.contains(&"previousRuns"));
        assert!(!fields.contains(&"category"));
        assert_eq!(fields.len(), 12);
    }
}
