use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the process-wide tracing subscriber: JSON lines to stdout,
/// filtered by `RUST_LOG` when set, falling back to `default_level`.
///
/// Call once, before request handling begins.
pub fn init_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();
}
