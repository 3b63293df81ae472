//! Subscriber setup for the command line front end.

use fusebox_core::{DEFAULT_LOG_FILTER, FUSEBOX_LOG_VAR};
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber.
///
/// `-v` flags win over `FUSEBOX_LOG`; without either the filter is `warn`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_env(FUSEBOX_LOG_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
