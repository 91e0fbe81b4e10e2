//! Logging infrastructure for Fitlog.
//!
//! Centralized tracing setup, shared by the CLI binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with environment-based filtering.
///
/// Defaults to WARN so normal CLI output stays clean; set RUST_LOG for
/// more detail (e.g. `RUST_LOG=fitlog_core=debug`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
