//! Asynchronous detail loading.
//!
//! Per-row history fetches run outside the engine and report back through a
//! callback, one completion at a time. A [`LivenessToken`] shared with the
//! engine turns late completions into no-ops once the engine is torn down.
//!
//! # Architecture
//!
//! - `messages`: request and outcome types, priority partitioning
//! - `loader`: bounded per-priority fetch loop
//! - `liveness`: teardown flag shared with in-flight work

pub mod liveness;
pub mod loader;
pub mod messages;

pub use liveness::LivenessToken;
pub use loader::{load_details, LoadSummary};
pub use messages::{partition, DetailOutcome, DetailRequest, Priority};
