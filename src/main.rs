//! Command line front end.
//!
//! Loads a JSON job fixture, runs it through a [`JobListView`] exactly as a
//! host would (first-visible population, history loading, filter and sort
//! events, teardown into the cache) and prints the resulting grid.
//!
//! # Usage
//!
//! ```text
//! jobgrid jobs.json
//! jobgrid jobs.json --filter "Last Run Outcome=Failed,Retry" --sort name:desc
//! jobgrid jobs.json --config jobgrid.toml --row 2 --no-color
//! ```
//!
//! Filters are applied in the order given, each stacking on the previous
//! ones; the sort is applied after them.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use jobgrid::app::{table_actions, Event, JobListView};
use jobgrid::domain::Column;
use jobgrid::observability::init_tracing;
use jobgrid::provider::{FixtureProvider, OwnerContext};
use jobgrid::storage::MemoryCache;
use jobgrid::ui::{render, GridViewModel};
use jobgrid::{Config, EngineSettings, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jobgrid", version, about = "Show an agent job list as a filtered, sorted grid")]
struct Cli {
    /// JSON fixture with `jobs` and per-job `details`.
    fixture: PathBuf,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server name shown in the title and used as the cache key.
    #[arg(long, default_value = "local")]
    server: String,

    /// Column filter, repeatable: `COLUMN=VALUE[,VALUE...]`.
    #[arg(long = "filter", value_name = "COLUMN=VALUES", value_parser = parse_filter)]
    filters: Vec<(Column, BTreeSet<String>)>,

    /// Sort column, optionally descending: `COLUMN[:desc]`.
    #[arg(long, value_name = "COLUMN[:desc]", value_parser = parse_sort)]
    sort: Option<(Column, bool)>,

    /// Print the action menu of the row at this projection index.
    #[arg(long, value_name = "INDEX")]
    row: Option<usize>,

    /// Plain output without ANSI colours.
    #[arg(long)]
    no_color: bool,

    /// Extra `key=value` settings, applied over the config file.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_setting)]
    settings: Vec<(String, String)>,
}

fn parse_column(name: &str) -> std::result::Result<Column, String> {
    Column::from_display_name(name.trim()).ok_or_else(|| {
        let known: Vec<&str> = Column::ALL.iter().map(|c| c.display_name()).collect();
        format!("unknown column `{name}` (expected one of: {})", known.join(", "))
    })
}

fn parse_filter(arg: &str) -> std::result::Result<(Column, BTreeSet<String>), String> {
    let (column, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUES, got `{arg}`"))?;
    let column = parse_column(column)?;
    if !column.is_data() {
        return Err(format!("column `{column}` cannot be filtered"));
    }
    let accepted = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((column, accepted))
}

fn parse_sort(arg: &str) -> std::result::Result<(Column, bool), String> {
    let (column, ascending) = match arg.rsplit_once(':') {
        Some((column, "desc")) => (column, false),
        Some((column, "asc")) => (column, true),
        _ => (arg, true),
    };
    let column = parse_column(column)?;
    if !column.is_data() {
        return Err(format!("column `{column}` cannot be sorted"));
    }
    Ok((column, ascending))
}

fn parse_setting(arg: &str) -> std::result::Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let overrides: BTreeMap<String, String> = cli.settings.iter().cloned().collect();
    Ok(config.with_overrides(&overrides))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config);
    tracing::debug!(fixture = ?cli.fixture, server = %cli.server, "starting");

    let provider = FixtureProvider::from_file(&cli.fixture)?;
    let owner = OwnerContext::new(format!("fixture://{}", cli.fixture.display()), cli.server.clone());
    let mut view = JobListView::new(provider, MemoryCache::new(), owner, EngineSettings::from(&config));

    view.on_first_visible().await?;

    for (column, accepted) in &cli.filters {
        view.handle(Event::FilterChanged {
            column: column.display_name().to_string(),
            accepted: accepted.clone(),
        })?;
    }
    if let Some((column, ascending)) = cli.sort {
        view.handle(Event::SortRequested {
            column: column.display_name().to_string(),
            ascending,
        })?;
    }

    let theme = if cli.no_color || !std::io::stdout().is_terminal() {
        None
    } else {
        config.resolve_theme()
    };
    let vm = GridViewModel::compute(view.engine());
    render(&vm, theme.as_ref());

    if let Some(index) = cli.row {
        match view.engine().table_context(index) {
            Some(ctx) => {
                println!("\n{} ({})", ctx.job.name, ctx.job.job_id);
                for item in table_actions(&ctx) {
                    let state = if item.enabled { "" } else { " (unavailable)" };
                    println!("  {}{state}", item.action.label());
                }
            }
            None => eprintln!("no row at index {index}"),
        }
    }

    view.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_columns_and_values() {
        let (column, accepted) = parse_filter("Last Run Outcome=Failed, Retry").unwrap();
        assert_eq!(column, Column::LastRunOutcome);
        assert_eq!(accepted, BTreeSet::from(["Failed".to_string(), "Retry".to_string()]));

        assert!(parse_filter("Previous Runs=x").is_err());
        assert!(parse_filter("Nope=x").is_err());
        assert!(parse_filter("Name").is_err());
    }

    #[test]
    fn sort_direction_suffix() {
        assert_eq!(parse_sort("Name:desc").unwrap(), (Column::Name, false));
        assert_eq!(parse_sort("Last Run").unwrap(), (Column::LastRun, true));
        assert!(parse_sort("Previous Runs").is_err());
    }

    #[test]
    fn settings_override_config() {
        let cli = Cli::parse_from(["jobgrid", "jobs.json", "--set", "history_window=9", "--set", "error_prefix=E: "]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.history_window, 9);
        assert_eq!(config.error_prefix, "E: ");
        assert_eq!(config.detail_batch_size, 4);
    }
}
