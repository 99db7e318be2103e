//! Tracing setup for the `medstock` binary.
//!
//! Log lines go to stderr so `list`, `predict` and `history` output on
//! stdout can be piped or diffed. `RUST_LOG` overrides the `info` default,
//! e.g. `RUST_LOG=medstock_core=debug medstock run` shows per-medication
//! deductions.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber; call once at startup
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route logs through the test harness so they show up for failing tests only
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("medstock_core=debug"))
        .try_init();
}
