//! Liveness token shared between an engine and its in-flight fetches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheaply cloneable flag that turns false once, at teardown.
///
/// # Example
///
/// ```
/// use jobgrid::worker::LivenessToken;
///
/// let token = LivenessToken::new();
/// let in_flight = token.clone();
/// token.revoke();
/// assert!(!in_flight.is_live());
/// ```
#[derive(Debug, Clone)]
pub struct LivenessToken(Arc<AtomicBool>);

impl LivenessToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}
