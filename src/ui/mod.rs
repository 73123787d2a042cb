//! Text rendering of the job grid.
//!
//! ```text
//! TabularEngine → GridViewModel::compute → GridViewModel → render_to_string → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready rows, header and empty state
//! - [`renderer`]: fixed-width table output
//! - [`chart`]: previous-runs bar heights
//! - [`theme`]: colour schemes and ANSI escape sequences

pub mod chart;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use chart::{run_chart, RunBar};
pub use renderer::{render, render_to_string};
pub use theme::{Theme, DEFAULT_THEME};
pub use viewmodel::{DisplayRow, EmptyState, GridViewModel, HeaderInfo};
