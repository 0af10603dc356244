use tracing_subscriber::{EnvFilter, fmt};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global `fmt` subscriber for the chat server.
///
/// Panics if a subscriber is already installed; call [`try_init`] where that
/// can happen.
///
/// # Examples
///
/// ```no_run
/// neurochat::logger::init();
/// tracing::info!(port = 5000, "chat server starting");
/// ```
pub fn init() {
    try_init().expect("failed to initialize tracing")
}

/// Install the global subscriber, filtered by `RUST_LOG` or
/// [`DEFAULT_FILTER`].
pub fn try_init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {e}"))
}
