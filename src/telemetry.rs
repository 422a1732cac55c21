//! Telemetry initialization: tracing subscriber with env-filtered
//! stdout output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. `RUST_LOG` wins over the
/// configured default directives.
pub fn init_tracing(default_directives: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
