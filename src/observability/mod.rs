//! Structured logging for the engine and the binary.
//!
//! Every engine mutation runs inside a debug span and reports what it did
//! through `tracing` events; this module installs the subscriber that turns
//! those into lines on stderr.
//!
//! # Configuration
//!
//! The filter is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use jobgrid::observability::init_tracing;
//! use jobgrid::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("engine ready");
//! ```

mod init;

pub use init::init_tracing;
