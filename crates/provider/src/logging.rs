//! Logging setup
//!
//! Installs a `tracing` subscriber that writes to stderr, leaving stdout to
//! the host. The filter is read from `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LEVEL: &str = "info";

/// Install the global subscriber with the default level
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LEVEL);
}

/// Install the global subscriber, falling back to `default` when `RUST_LOG` is unset
pub fn init_logging_with_default(default: &str) {
    let _ = try_init_logging_with_default(default);
}

/// Install the global subscriber, failing if one is already installed
pub fn try_init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    try_init_logging_with_default(DEFAULT_LEVEL)
}

fn try_init_logging_with_default(
    default: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
