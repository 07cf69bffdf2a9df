//! Implementation of the `clairscan up` command.

use crate::config::Config;
use crate::context::ScanContext;
use crate::error::Result;
use crate::services::ensure_services;

pub fn cmd_up(ctx: &ScanContext, config: &Config) -> Result<()> {
    ensure_services(ctx, config)?;
    println!(
        "Services ready: {} (database), {} (engine)",
        config.database.name, config.engine.name
    );
    Ok(())
}
