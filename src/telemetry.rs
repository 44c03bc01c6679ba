//! Structured logging set-up.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_FILTER_ENV: &str = "CLUBHOUSE_LOG";

/// Filter applied when neither [`LOG_FILTER_ENV`] nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from [`LOG_FILTER_ENV`], then `RUST_LOG`, then
/// [`DEFAULT_LOG_FILTER`]. Unparsable directives fall through to the next
/// source.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global fmt subscriber. Later calls are ignored.
pub fn init_tracing() {
    if tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
