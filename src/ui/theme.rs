//! Theme management and ANSI escape sequence generation.
//!
//! Themes colour the text rendering of the grid: headers, the red family used
//! for failing jobs and their detail rows, outcome indicators and the
//! previous-runs chart. Built-in themes are compiled in; custom themes are
//! read from TOML files.
//!
//! # Built-in Themes
//!
//! - `grid-dark`: dark background palette (default)
//! - `grid-light`: light background palette
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! empty_state_fg = "#89b4fa"
//! job_with_error_fg = "#f38ba8"
//! error_row_fg = "#eba0ac"
//! indicator_success = "#a6e3a1"
//! indicator_failure = "#f38ba8"
//! indicator_unknown = "#f9e2af"
//! chart_pass = "#a6e3a1"
//! chart_fail = "#f38ba8"
//! ```
//!
//! # Example
//!
//! ```
//! use jobgrid::ui::Theme;
//!
//! let theme = Theme::from_name("grid-dark").unwrap();
//! println!("{}failed{}", Theme::fg(&theme.colors.job_with_error_fg), Theme::reset());
//! ```

use crate::app::RowClass;
use crate::domain::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "grid-dark";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Color definitions, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub text_normal: String,
    /// Separators, counts and other secondary text.
    pub text_dim: String,
    pub border: String,
    pub empty_state_fg: String,

    /// Text of a failing job that has a detail row.
    pub job_with_error_fg: String,
    /// Text of a detail row.
    pub error_row_fg: String,
    #[serde(default)]
    pub error_row_bg: Option<String>,

    pub indicator_success: String,
    pub indicator_failure: String,
    pub indicator_unknown: String,

    pub chart_pass: String,
    pub chart_fail: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "grid-dark" => include_str!("../../themes/grid-dark.toml"),
            "grid-light" => include_str!("../../themes/grid-light.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GridError::Config(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents).map_err(|e| GridError::Config(format!("failed to parse theme TOML: {e}")))
    }

    /// Foreground color for rows carrying `class`.
    #[must_use]
    pub fn row_fg(&self, class: RowClass) -> &str {
        match class {
            RowClass::JobWithError => &self.colors.job_with_error_fg,
            RowClass::ErrorRow => &self.colors.error_row_fg,
        }
    }

    /// Indicator color for an outcome indicator class.
    #[must_use]
    pub fn indicator_fg(&self, indicator_class: &str) -> &str {
        if indicator_class.ends_with("success") {
            &self.colors.indicator_success
        } else if indicator_class.ends_with("failure") {
            &self.colors.indicator_failure
        } else {
            &self.colors.indicator_unknown
        }
    }

    /// Strips `#` and parses; anything malformed renders white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        for name in ["grid-dark", "grid-light"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
        assert!(Theme::from_name(DEFAULT_THEME).is_some());
    }

    #[test]
    fn escapes_fall_back_to_white() {
        assert_eq!(Theme::fg("#ff0000"), "\u{001b}[38;2;255;0;0m");
        assert_eq!(Theme::bg("nope"), "\u{001b}[48;2;255;255;255m");
    }

    #[test]
    fn theme_files_load_and_report_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../themes/grid-light.toml").as_bytes())
            .unwrap();
        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.colors.header_bg.as_deref(), Some("#e6e9ef"));
        assert_eq!(theme.row_fg(RowClass::ErrorRow), "#e64553");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"name = 3").unwrap();
        assert!(matches!(Theme::from_file(broken.path()), Err(GridError::Config(_))));
    }

    #[test]
    fn indicator_colors_follow_class_suffix() {
        let theme = Theme::from_name("grid-dark").unwrap();
        assert_eq!(theme.indicator_fg("jobview-jobnameindicatorsuccess"), "#a6e3a1");
        assert_eq!(theme.indicator_fg("jobview-jobnameindicatorfailure"), "#f38ba8");
        assert_eq!(theme.indicator_fg("jobview-jobnameindicatorunknown"), "#f9e2af");
    }
}
