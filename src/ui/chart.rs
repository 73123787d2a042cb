//! Previous-runs bar chart.
//!
//! Bars are scaled against the longest run in the window so the tallest bar
//! is [`MAX_BAR_HEIGHT`] pixels. A window of zero-length runs shows minimal
//! bars instead of nothing.

use crate::domain::job::duration_to_seconds;
use crate::domain::JobHistory;
use serde::{Deserialize, Serialize};

pub const MAX_BAR_HEIGHT: f64 = 24.0;
pub const MIN_BAR_HEIGHT: f64 = 5.0;

/// One bar of a job's previous-runs chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBar {
    pub height_px: f64,
    pub failed: bool,
    /// Run duration as reported, shown as the bar's tooltip.
    pub duration: String,
}

/// The most recent `window` histories, oldest first.
#[must_use]
pub fn recent_runs(histories: &[JobHistory], window: usize) -> &[JobHistory] {
    &histories[histories.len().saturating_sub(window)..]
}

/// Bar heights in pixels for `histories`.
#[must_use]
pub fn chart_heights(histories: &[JobHistory]) -> Vec<f64> {
    if histories.is_empty() {
        return Vec::new();
    }
    let seconds: Vec<u64> = histories.iter().map(|h| duration_to_seconds(&h.run_duration)).collect();
    let max = seconds.iter().copied().max().unwrap_or(0).max(1);

    #[allow(clippy::cast_precision_loss)]
    let heights: Vec<f64> = seconds
        .iter()
        .map(|&s| MAX_BAR_HEIGHT * s as f64 / max as f64)
        .collect();

    if heights.iter().all(|h| *h == 0.0) {
        vec![MIN_BAR_HEIGHT; histories.len()]
    } else {
        heights
    }
}

/// Chart for the last `window` runs of a job.
#[must_use]
pub fn run_chart(histories: &[JobHistory], window: usize) -> Vec<RunBar> {
    let recent = recent_runs(histories, window);
    chart_heights(recent)
        .into_iter()
        .zip(recent)
        .map(|(height_px, history)| RunBar {
            height_px,
            failed: history.failed(),
            duration: history.run_duration.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(status: i32, duration: &str) -> JobHistory {
        JobHistory {
            run_status: status,
            run_duration: duration.to_string(),
            run_date: String::new(),
            message: String::new(),
        }
    }

    #[test]
    fn heights_scale_to_longest_run() {
        let heights = chart_heights(&[history(1, "00:00:10"), history(1, "00:00:20"), history(1, "00:00:00")]);
        assert_eq!(heights, [12.0, 24.0, 0.0]);
    }

    #[test]
    fn all_zero_durations_get_minimal_bars() {
        let heights = chart_heights(&[history(1, "00:00:00"), history(0, "")]);
        assert_eq!(heights, [5.0, 5.0]);
        assert!(chart_heights(&[]).is_empty());
    }

    #[test]
    fn overflowing_duration_gets_an_empty_bar() {
        let heights = chart_heights(&[history(1, "9999999999999999999:00:00"), history(1, "00:00:10")]);
        assert_eq!(heights, [0.0, 24.0]);
    }

    #[test]
    fn chart_keeps_the_last_window() {
        let histories: Vec<JobHistory> = (1..=7)
            .map(|i| history(i % 2, &format!("00:00:{i:02}")))
            .collect();
        let chart = run_chart(&histories, 5);
        assert_eq!(chart.len(), 5);
        assert_eq!(chart[0].duration, "00:00:03");
        assert!(chart[1].failed);
        assert_eq!(chart[4].height_px, 24.0);
    }
}
