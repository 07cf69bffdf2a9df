//! Command implementations for clairscan.
//!
//! This module provides the dispatcher that resolves the working-directory
//! context and config once, then routes CLI commands to their handlers.

mod check;
mod doctor;
mod fetch;
mod history;
mod report;
mod scan;
mod up;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command};
use crate::context::ScanContext;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = ScanContext::resolve(cli.dir.as_deref(), cli.config.as_deref())?;
    tracing::debug!(work_dir = %ctx.work_dir.display(), "resolved context");

    // Doctor reports a broken config as an issue instead of failing on it.
    if matches!(cli.command, Command::Doctor) {
        return doctor::cmd_doctor(&ctx);
    }

    let config = ctx.load_config()?;
    match cli.command {
        Command::Check(args) => check::cmd_check(&ctx, &config, args),
        Command::Up => up::cmd_up(&ctx, &config),
        Command::Fetch(args) => fetch::cmd_fetch(&ctx, &config, args),
        Command::Report(args) => report::cmd_report(&ctx, &config, args),
        Command::Scan(args) => scan::cmd_scan(&ctx, &config, args),
        Command::History(args) => history::cmd_history(&ctx, args),
        Command::Doctor => doctor::cmd_doctor(&ctx),
    }
}
