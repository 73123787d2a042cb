//! Column comparators.
//!
//! One comparator per [`ColumnKind`]. Date columns read their own field and
//! rank the "no date" sentinels lowest, so an ascending sort lists never-run
//! jobs first and a descending sort lists them last.

use crate::domain::column::{NEVER_RUN, NOT_SCHEDULED};
use crate::domain::{Column, ColumnKind, Row};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// Date layouts providers are known to emit, tried in order.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Sort key of a date cell.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey<'a> {
    Sentinel,
    Unparsed(&'a str),
    Parsed(NaiveDateTime),
}

/// Parses a date cell as the provider renders it.
///
/// # Example
///
/// ```
/// use jobgrid::app::sort::parse_date;
///
/// assert!(parse_date("3/14/2019 10:22:12 AM").is_some());
/// assert!(parse_date("2019-03-14T10:22:12Z").is_some());
/// assert!(parse_date("Never Run").is_none());
/// ```
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%m/%d/%Y")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn date_key<'a>(value: &'a str, sentinel: &str) -> DateKey<'a> {
    if value == sentinel || value == NEVER_RUN || value == NOT_SCHEDULED || value.is_empty() {
        DateKey::Sentinel
    } else {
        parse_date(value).map_or(DateKey::Unparsed(value), DateKey::Parsed)
    }
}

/// Compares two date cells, sentinels lowest.
#[must_use]
pub fn compare_dates(a: &str, b: &str, sentinel: &str) -> Ordering {
    date_key(a, sentinel).cmp(&date_key(b, sentinel))
}

/// Compares two text cells ignoring case, then by exact text.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ascending comparison of two rows on `column`.
///
/// Chart columns compare equal, which leaves a stable sort untouched.
#[must_use]
pub fn compare_rows(column: Column, a: &Row, b: &Row) -> Ordering {
    let left = a.value(column).unwrap_or_default();
    let right = b.value(column).unwrap_or_default();
    match column.kind() {
        ColumnKind::Text => compare_text(left, right),
        ColumnKind::Date { sentinel } => compare_dates(left, right, sentinel),
        ColumnKind::Chart => Ordering::Equal,
    }
}
