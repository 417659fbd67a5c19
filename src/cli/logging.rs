//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Initialise logging on stderr. `info` by default; with `verbose` the level
/// is `debug` and `RUST_LOG` may override it.
pub fn init(verbose: bool) {
    // Without --verbose, RUST_LOG is ignored so a stray variable in the
    // environment cannot flood the terminal.
    let level = if verbose { "debug" } else { "info" };

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
