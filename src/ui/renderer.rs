//! Text rendering of a [`GridViewModel`].
//!
//! Produces a fixed-width table: a title line with counts, the active
//! filters and sort, a header row, then one line per projection entry.
//! Detail rows are indented beneath their parent and span the whole width.
//! With a theme, output is coloured with ANSI escapes; without one it is
//! plain text.
//!
//! # Example
//!
//! ```
//! use jobgrid::app::{EngineSettings, TabularEngine};
//! use jobgrid::storage::MemoryCache;
//! use jobgrid::ui::{render_to_string, GridViewModel};
//!
//! let engine = TabularEngine::new("local", &MemoryCache::new(), EngineSettings::default());
//! let text = render_to_string(&GridViewModel::compute(&engine), None);
//! assert!(text.contains("No jobs to show"));
//! ```

use super::chart::{RunBar, MAX_BAR_HEIGHT};
use super::theme::Theme;
use super::viewmodel::{DisplayRow, GridViewModel};
use crate::domain::{Column, ColumnKind};
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 28;
const SEPARATOR: &str = "  ";
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders the view model to a string.
#[must_use]
pub fn render_to_string(vm: &GridViewModel, theme: Option<&Theme>) -> String {
    let mut out = String::new();
    render_header(&mut out, vm, theme);

    if let Some(empty) = &vm.empty_state {
        let (on, off) = paint(theme, |t| Theme::fg(&t.colors.empty_state_fg));
        let _ = writeln!(out, "\n{on}{}{off}", empty.message);
        let _ = writeln!(out, "{}", dimmed(theme, &empty.subtitle));
        return out;
    }

    let widths = column_widths(vm);
    render_column_headers(&mut out, vm, &widths, theme);
    for row in &vm.rows {
        if row.is_detail {
            render_detail_row(&mut out, row, &widths, theme);
        } else {
            render_record_row(&mut out, vm, row, &widths, theme);
        }
    }
    out
}

/// Renders the view model to stdout.
pub fn render(vm: &GridViewModel, theme: Option<&Theme>) {
    print!("{}", render_to_string(vm, theme));
}

/// Opening and closing escapes, or nothing without a theme.
fn paint(theme: Option<&Theme>, open: impl FnOnce(&Theme) -> String) -> (String, &'static str) {
    theme.map_or((String::new(), ""), |t| (open(t), Theme::reset()))
}

fn dimmed(theme: Option<&Theme>, text: &str) -> String {
    let (on, off) = paint(theme, |t| format!("{}{}", Theme::dim(), Theme::fg(&t.colors.text_dim)));
    format!("{on}{text}{off}")
}

fn render_header(out: &mut String, vm: &GridViewModel, theme: Option<&Theme>) {
    let header = &vm.header;
    let (on, off) = paint(theme, |t| {
        let bg = t.colors.header_bg.as_deref().map(Theme::bg).unwrap_or_default();
        format!("{}{}{bg}", Theme::bold(), Theme::fg(&t.colors.header_fg))
    });
    let _ = writeln!(out, "{on}{}{off}", header.title);

    let mut summary = format!("{} of {} jobs", header.visible, header.total);
    if !header.filters.is_empty() {
        let _ = write!(summary, " | filtered by {}", header.filters.join("; "));
    }
    if let Some(sort) = &header.sort {
        let _ = write!(summary, " | sorted by {sort}");
    }
    let _ = writeln!(out, "{}", dimmed(theme, &summary));
}

fn column_widths(vm: &GridViewModel) -> Vec<usize> {
    vm.columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let content = match column.kind() {
                ColumnKind::Chart => vm.rows.iter().map(|r| r.chart.len()).max().unwrap_or(0),
                _ => vm
                    .rows
                    .iter()
                    .filter(|r| !r.is_detail)
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0),
            };
            content.max(column.display_name().chars().count()).min(MAX_CELL_WIDTH)
        })
        .collect()
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text:<width$}");
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn render_column_headers(out: &mut String, vm: &GridViewModel, widths: &[usize], theme: Option<&Theme>) {
    let line = vm
        .columns
        .iter()
        .zip(widths)
        .map(|(column, width)| fit(column.display_name(), *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let (on, off) = paint(theme, |t| format!("{}{}", Theme::bold(), Theme::fg(&t.colors.header_fg)));
    let _ = writeln!(out, "  {on}{}{off}", line.trim_end());

    let rule: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * widths.len().saturating_sub(1);
    let (on, off) = paint(theme, |t| Theme::fg(&t.colors.border));
    let _ = writeln!(out, "  {on}{}{off}", "─".repeat(rule));
}

fn chart_glyphs(chart: &[RunBar], theme: Option<&Theme>) -> String {
    chart
        .iter()
        .map(|bar| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let level = ((bar.height_px / MAX_BAR_HEIGHT) * 7.0).round().clamp(0.0, 7.0) as usize;
            let glyph = BAR_GLYPHS[level];
            let (on, off) = paint(theme, |t| {
                Theme::fg(if bar.failed { &t.colors.chart_fail } else { &t.colors.chart_pass })
            });
            format!("{on}{glyph}{off}")
        })
        .collect()
}

fn render_record_row(out: &mut String, vm: &GridViewModel, row: &DisplayRow, widths: &[usize], theme: Option<&Theme>) {
    let (on, off) = match (theme, row.class) {
        (Some(t), Some(class)) => (Theme::fg(t.row_fg(class)), Theme::reset()),
        (Some(t), None) => (Theme::fg(&t.colors.text_normal), Theme::reset()),
        (None, _) => (String::new(), ""),
    };

    let cells: Vec<String> = vm
        .columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (column, width))| {
            if *column == Column::PreviousRuns {
                let glyphs = chart_glyphs(&row.chart, theme);
                let pad = width.saturating_sub(row.chart.len());
                format!("{glyphs}{on}{}", " ".repeat(pad))
            } else {
                fit(row.cells.get(i).map_or("", String::as_str), *width)
            }
        })
        .collect();

    let marker = match (theme, row.indicator) {
        (Some(t), Some(indicator)) => format!("{}●{}{on}", Theme::fg(t.indicator_fg(indicator)), Theme::reset()),
        (None, Some(_)) => "●".to_string(),
        (_, None) => " ".to_string(),
    };
    let _ = writeln!(out, "{on}{marker} {}{off}", cells.join(SEPARATOR).trim_end());
}

fn render_detail_row(out: &mut String, row: &DisplayRow, widths: &[usize], theme: Option<&Theme>) {
    let span: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * widths.len().saturating_sub(1);
    let message = row.cells.first().map_or("", String::as_str);
    let (on, off) = paint(theme, |t| {
        let bg = t.colors.error_row_bg.as_deref().map(Theme::bg).unwrap_or_default();
        format!("{}{bg}", Theme::fg(&t.colors.error_row_fg))
    });
    let _ = writeln!(out, "  {on}└ {}{off}", fit(message, span.saturating_sub(2)).trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{EngineSettings, TabularEngine};
    use crate::domain::{JobDetail, JobHistory, JobInfo, RowId};
    use crate::storage::MemoryCache;
    use crate::worker::DetailOutcome;

    fn engine() -> TabularEngine {
        let jobs: Vec<JobInfo> = serde_json::from_str(
            r#"[
                {"jobId":"a","name":"alpha","lastRunOutcome":0},
                {"jobId":"b","name":"bravo","lastRunOutcome":1}
            ]"#,
        )
        .unwrap();
        let mut engine = TabularEngine::new("prod", &MemoryCache::new(), EngineSettings::default());
        engine.populate(jobs);
        engine.expand(true);
        engine
    }

    #[test]
    fn plain_output_has_no_escapes() {
        let text = render_to_string(&GridViewModel::compute(&engine()), None);
        assert!(!text.contains('\u{001b}'));
        assert!(text.starts_with("Jobs on prod\n2 of 2 jobs\n"));

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].trim_start().starts_with("Name"));
        assert!(lines[4].starts_with("● alpha"));
        assert!(lines[5].contains("└ Loading Error..."));
        assert!(lines[6].starts_with("● bravo"));
    }

    #[test]
    fn charts_render_as_bars() {
        let mut engine = engine();
        let detail = JobDetail {
            histories: vec![
                JobHistory {
                    run_status: 1,
                    run_duration: "00:00:00".into(),
                    run_date: String::new(),
                    message: String::new(),
                },
                JobHistory {
                    run_status: 0,
                    run_duration: "00:01:00".into(),
                    run_date: String::new(),
                    message: "boom".into(),
                },
            ],
            ..JobDetail::default()
        };
        engine
            .apply_detail(DetailOutcome::loaded(RowId::new("a"), detail))
            .unwrap();

        let text = render_to_string(&GridViewModel::compute(&engine), None);
        assert!(text.contains("▁█"));
        assert!(text.contains("└ Error: boom"));
    }

    #[test]
    fn themed_output_is_coloured() {
        let theme = Theme::from_name("grid-dark").unwrap();
        let text = render_to_string(&GridViewModel::compute(&engine()), Some(&theme));
        assert!(text.contains(&Theme::fg(&theme.colors.error_row_fg)));
        assert!(text.contains(Theme::reset()));
    }

    #[test]
    fn long_cells_are_clipped() {
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
