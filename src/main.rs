//! Clairscan: scan container images against a local vulnerability database.
//!
//! This is the main entry point for the `clairscan` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod docker;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fetch;
pub mod guard;
mod logging;
pub mod report;
pub mod runner;
pub mod scanners;
pub mod services;

#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1 so they never read as a resource conflict.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(exit_codes::USER_ERROR as u8)
            } else {
                ExitCode::from(exit_codes::SUCCESS as u8)
            };
        }
    };

    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            tracing::debug!(error = ?err, "command failed");

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
