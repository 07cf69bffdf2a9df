//! Implementation of the `clairscan scan` command (JSON flow).

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::context::ScanContext;
use crate::error::Result;
use crate::fetch::acquire;
use crate::scanners::clair_scanner;
use crate::services::ensure_services;

pub fn cmd_scan(ctx: &ScanContext, config: &Config, args: ScanArgs) -> Result<()> {
    let threshold = args.threshold.unwrap_or(config.threshold);
    let report = match &args.output {
        Some(path) => ctx.report_path(path),
        None => ctx.report_path(&config.report_file),
    };

    ensure_services(ctx, config)?;
    acquire(ctx, config, &config.clair_scanner, false)?;

    clair_scanner::run(ctx, config, args.image.as_deref(), threshold, &report)?;
    if args.image.is_none() {
        println!("No image given; pass one to scan it.");
    }
    Ok(())
}
