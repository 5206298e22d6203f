// Structured logging setup for the binary

use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter, e.g. `binpack=debug`
pub const LOG_ENV: &str = "BINPACK_LOG";

/// Install a stderr subscriber filtered by `BINPACK_LOG` (default `info`).
///
/// Returns false when a subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }

    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .is_ok()
}
