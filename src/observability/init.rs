//! Tracing subscriber setup.

use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Installs a stderr subscriber filtered per [`Config::trace_level`].
///
/// Idempotent: only the first call in a process takes effect, later calls
/// (and calls after another subscriber was installed) are ignored.
///
/// # Example
///
/// ```rust
/// use jobgrid::observability::init_tracing;
/// use jobgrid::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), config.trace_level.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    if subscriber.try_init().is_ok() {
        tracing::debug!(filter = %directive, "tracing initialized");
    }
}

/// Picks the first non-empty of `env` and `configured`, else the default.
fn filter_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| configured.filter(|v| !v.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}
