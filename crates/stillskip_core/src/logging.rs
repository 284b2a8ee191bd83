//! Logging setup for the stillskip tools.
//!
//! Everything in the engine logs through `tracing`; this module wires up
//! the global subscriber. Pass progress goes out at info, collaborator
//! argv and conduit paths at debug, selection-loop progress at trace.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; otherwise falls back to `info`, or
/// `debug` when `verbose` is requested. Should be called once at startup.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
