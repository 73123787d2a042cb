//! Jobgrid: a tabular state engine for agent job lists.
//!
//! Jobgrid keeps a grid of scheduled agent jobs consistent while a user
//! filters, sorts and expands it:
//! - Per-column filters that stack, with "undo the latest filter" semantics
//! - Stable, column-aware sorting (date sentinels such as `Never Run` included)
//! - Inline error-detail rows under every failing job, filled in as the
//!   job's history arrives
//! - Row style annotations cached per filter snapshot, so undoing a filter
//!   restores styling without recomputing it
//! - A cross-instance cache that lets a reopened view show its rows at once

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - TabularEngine: DataView + FilterStack +          │
//! │    RowStyleCache                                    │
//! │  - Event handling, actions, view lifecycle          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View model  │   │ - CacheStore  │   │ - Detail load │
//! │ - Text table  │   │ - MemoryCache │   │ - Liveness    │
//! │ - Theming     │   │               │   │ - Priorities  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Provider & Domain Layers                           │
//! │  - JobProvider trait, JSON fixtures (provider/)     │
//! │  - Rows, columns, jobs, errors (domain/)            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber with env filter               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: The engine, events, actions and the view driver
//! - [`domain`]: Core domain types (rows, columns, provider records, errors)
//! - [`provider`]: The job provider seam and a JSON fixture provider
//! - [`storage`]: Cross-instance cache of grid state
//! - [`worker`]: Prioritised, bounded detail loading
//! - [`ui`]: View model and text rendering with theme support
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Settings come from a TOML file, or from a flat string map when a host
//! hands over a settings bag:
//!
//! ```toml
//! detail_batch_size = 4
//! history_window = 5
//! loading_message = "Loading Error..."
//! theme_name = "grid-light"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use jobgrid::app::{EngineSettings, TabularEngine};
//! use jobgrid::domain::{Column, JobInfo};
//! use jobgrid::storage::MemoryCache;
//! use jobgrid::Config;
//!
//! let jobs: Vec<JobInfo> = serde_json::from_str(
//!     r#"[{"jobId":"a","name":"nightly","lastRunOutcome":0},
//!         {"jobId":"b","name":"hourly","lastRunOutcome":1}]"#,
//! )?;
//!
//! let settings = EngineSettings::from(&Config::default());
//! let mut engine = TabularEngine::new("local", &MemoryCache::new(), settings);
//! engine.populate(jobs);
//! engine.expand(true);
//! assert_eq!(engine.projection_ids(), ["a", "a.error", "b"]);
//!
//! let accepted: BTreeSet<String> = ["Succeeded".to_string()].into();
//! engine.apply_filter(Column::LastRunOutcome, accepted);
//! assert_eq!(engine.projection_ids(), ["b"]);
//!
//! engine.apply_filter(Column::LastRunOutcome, BTreeSet::new());
//! assert_eq!(engine.projection_ids(), ["a", "a.error", "b"]);
//! # Ok::<(), jobgrid::GridError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Projection, not copies
//!
//! Filtering and sorting never copy rows: the view keeps one item list and a
//! projection of indices into it, rebuilt on every refresh. Detail rows live
//! inside their parent row and are spliced into the projection directly
//! after it.
//!
//! ## Snapshot-keyed styling
//!
//! Style annotations are positional, so they are recorded under the filter
//! snapshot that produced the projection. Undoing a filter whose snapshot
//! still matches the projection reinstalls the recorded annotations instead
//! of walking the grid again.
//!
//! ## Liveness tokens
//!
//! Detail fetches outlive nothing: a view hands its loader a token, and
//! teardown revokes it, so late completions are dropped instead of touching
//! a retired engine.

pub mod app;
pub mod domain;
pub mod observability;
pub mod provider;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, EngineSettings, Event, JobListView, TabularEngine};
pub use domain::{GridError, Result};
pub use ui::Theme;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Runtime configuration.
///
/// # Example
///
/// ```toml
/// detail_batch_size = 8
/// history_window = 10
/// error_prefix = "Failed: "
/// theme_file = "/path/to/theme.toml"
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detail fetches in flight per priority group. Default: 4
    pub detail_batch_size: usize,

    /// Number of recent runs shown in the previous-runs chart. Default: 5
    pub history_window: usize,

    /// Detail row text while its job's history is loading.
    ///
    /// Default: `"Loading Error..."`
    pub loading_message: String,

    /// Prepended to a job's latest error message. Default: `"Error: "`
    pub error_prefix: String,

    /// Shown instead of an error message when a job has no history.
    ///
    /// Default: `"No Steps available for this job."`
    pub no_steps_message: String,

    /// Built-in theme name to use.
    ///
    /// Options: `grid-dark`, `grid-light`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing filter, overridden by `RUST_LOG`.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            detail_batch_size: settings.detail_batch_size,
            history_window: settings.history_window,
            loading_message: settings.loading_message,
            error_prefix: settings.error_prefix,
            no_steps_message: settings.no_steps_message,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat settings map.
    ///
    /// Every key is optional; missing or unparseable values fall back to
    /// their defaults, so a host can pass its settings bag through as is.
    ///
    /// # Parsing Rules
    ///
    /// - `detail_batch_size`, `history_window`: String → `usize` (zero and
    ///   parse errors fall back to the default)
    /// - `loading_message`, `error_prefix`, `no_steps_message`: taken verbatim
    /// - `theme` or `theme_name`: String → `Option<String>`
    /// - `theme_file`: String → `Option<String>`
    /// - `trace_level`: String → `Option<String>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use jobgrid::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("detail_batch_size".to_string(), "2".to_string());
    /// map.insert("history_window".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.detail_batch_size, 2);
    /// assert_eq!(config.history_window, 5);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Replaces the values named in `map`, keeping the rest.
    ///
    /// Follows the parsing rules of [`from_map`](Self::from_map); a value
    /// that fails to parse leaves the current one in place.
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let count = |key: &str| {
            map.get(key)
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
        };

        if let Some(n) = count("detail_batch_size") {
            self.detail_batch_size = n;
        }
        if let Some(n) = count("history_window") {
            self.history_window = n;
        }
        for (key, field) in [
            ("loading_message", &mut self.loading_message),
            ("error_prefix", &mut self.error_prefix),
            ("no_steps_message", &mut self.no_steps_message),
        ] {
            if let Some(value) = map.get(key) {
                field.clone_from(value);
            }
        }
        if let Some(name) = map.get("theme").or_else(|| map.get("theme_name")) {
            self.theme_name = Some(name.clone());
        }
        if let Some(file) = map.get("theme_file") {
            self.theme_file = Some(file.clone());
        }
        if let Some(level) = map.get("trace_level") {
            self.trace_level = Some(level.clone());
        }
        self
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if the text is not valid TOML, a value
    /// has the wrong type, or a count is zero.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GridError::Config(format!("failed to parse config TOML: {e}")))?;
        if config.detail_batch_size == 0 {
            return Err(GridError::Config("detail_batch_size must be at least 1".to_string()));
        }
        if config.history_window == 0 {
            return Err(GridError::Config("history_window must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GridError::Config(format!("failed to read config file {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Resolves the configured theme.
    ///
    /// A theme file wins over a theme name; anything that fails to load is
    /// logged and replaced by the default theme.
    #[must_use]
    pub fn resolve_theme(&self) -> Option<Theme> {
        if let Some(theme_file) = &self.theme_file {
            match Theme::from_file(theme_file) {
                Ok(theme) => return Some(theme),
                Err(e) => {
                    tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                }
            }
        } else if let Some(theme_name) = &self.theme_name {
            match Theme::from_name(theme_name) {
                Some(theme) => return Some(theme),
                None => tracing::warn!(theme_name = %theme_name, "unknown theme, using default"),
            }
        }
        Theme::from_name(ui::DEFAULT_THEME)
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            loading_message: config.loading_message.clone(),
            error_prefix: config.error_prefix.clone(),
            no_steps_message: config.no_steps_message.clone(),
            history_window: config.history_window.max(1),
            detail_batch_size: config.detail_batch_size.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_engine_settings() {
        let settings = EngineSettings::from(&Config::default());
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn map_values_fall_back_per_key() {
        let map: BTreeMap<String, String> = [
            ("detail_batch_size", "0"),
            ("history_window", "7"),
            ("error_prefix", "Failed: "),
            ("theme", "grid-light"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.detail_batch_size, 4);
        assert_eq!(config.history_window, 7);
        assert_eq!(config.error_prefix, "Failed: ");
        assert_eq!(config.loading_message, "Loading Error...");
        assert_eq!(config.theme_name.as_deref(), Some("grid-light"));
    }

    #[test]
    fn toml_fills_missing_keys() {
        let config = Config::from_toml_str("history_window = 3\ntrace_level = \"debug\"\n").unwrap();
        assert_eq!(config.history_window, 3);
        assert_eq!(config.detail_batch_size, 4);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));

        assert!(matches!(Config::from_toml_str("history_window = \"x\""), Err(GridError::Config(_))));
        assert!(matches!(Config::from_toml_str("detail_batch_size = 0"), Err(GridError::Config(_))));
    }

    #[test]
    fn config_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "detail_batch_size = 2\nno_steps_message = \"nothing\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.detail_batch_size, 2);
        assert_eq!(config.no_steps_message, "nothing");

        assert!(matches!(Config::from_file("/nonexistent/jobgrid.toml"), Err(GridError::Config(_))));
    }

    #[test]
    fn theme_resolution_falls_back_to_default() {
        let named = Config {
            theme_name: Some("grid-light".to_string()),
            ..Config::default()
        };
        assert_eq!(named.resolve_theme().map(|t| t.name), Some("grid-light".to_string()));

        let unknown = Config {
            theme_name: Some("neon".to_string()),
            ..Config::default()
        };
        assert_eq!(unknown.resolve_theme().map(|t| t.name), Some(ui::DEFAULT_THEME.to_string()));

        let missing_file = Config {
            theme_file: Some("/nonexistent/theme.toml".to_string()),
            theme_name: Some("grid-light".to_string()),
            ..Config::default()
        };
        assert_eq!(missing_file.resolve_theme().map(|t| t.name), Some(ui::DEFAULT_THEME.to_string()));
    }
}
