//! Error types for the job grid.
//!
//! This module defines the centralized error type [`GridError`] and a type alias
//! [`Result`] used throughout the crate. Several variants describe conditions the
//! engine absorbs on purpose (an unavailable provider becomes an empty list, a
//! late detail completion is discarded); they exist so the boundary that absorbs
//! them can log what happened.

use thiserror::Error;

/// The main error type for job grid operations.
///
/// # Examples
///
/// ```
/// use jobgrid::GridError;
///
/// fn load() -> Result<(), GridError> {
///     Err(GridError::ProviderUnavailable("no connection".to_string()))
/// }
/// assert!(load().is_err());
/// ```
#[derive(Debug, Error)]
pub enum GridError {
    /// The job provider returned nothing or could not be reached.
    ///
    /// Treated as an empty row list by the view, never as a fatal error.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Fetching the step/schedule/history detail of one row failed.
    ///
    /// The engine substitutes the placeholder message and marks the row's
    /// detail as loaded anyway.
    #[error("Detail fetch failed for {row_id}: {message}")]
    DetailFetchFailed {
        /// Identifier of the row whose detail was requested.
        row_id: String,
        /// Provider supplied failure description.
        message: String,
    },

    /// A detail completion arrived after the engine was torn down.
    #[error("Stale completion for {row_id}")]
    StaleCompletion {
        /// Identifier of the row the completion belonged to.
        row_id: String,
    },

    /// The cross-instance cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON fixture or payload could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for job grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
