//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Crates whose events are shown by default.
const CRATES: [&str; 3] = ["nbweights_core", "nbweights_convert", "nbweights_cli"];

/// Default filter directive for the workspace crates at the given level.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the nbweights tracing/logging system.
///
/// Reads `NBWEIGHTS_LOG` for per-crate log levels, e.g.
/// `NBWEIGHTS_LOG=nbweights_convert=debug`. Falls back to `info` for the
/// workspace crates (`debug` when `verbose`) if unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("NBWEIGHTS_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}
