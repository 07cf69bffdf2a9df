//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; command results are printed to
//! stdout by the commands themselves. `CLAIRSCAN_LOG` takes an `EnvFilter`
//! directive and wins over `-v`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "CLAIRSCAN_LOG";

/// Default filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
