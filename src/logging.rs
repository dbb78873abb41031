//! Subscriber setup for the `tracing` events emitted by the library.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "MINDMAP_LOG";

/// Install a stderr subscriber. `verbosity` is the number of `-v` flags.
///
/// A second call is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
