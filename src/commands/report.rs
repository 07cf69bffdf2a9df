//! Implementation of the `clairscan report` command (HTML flow).

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::context::ScanContext;
use crate::error::Result;
use crate::fetch::acquire;
use crate::scanners::clairctl;
use crate::services::ensure_services;

pub fn cmd_report(ctx: &ScanContext, config: &Config, args: ReportArgs) -> Result<()> {
    ensure_services(ctx, config)?;
    acquire(ctx, config, &config.clairctl, false)?;

    let reports = clairctl::run(ctx, config, args.image.as_deref())?;
    if args.image.is_none() {
        println!("No image given; pass one to push, analyze and report it.");
        return Ok(());
    }

    if reports.is_empty() {
        println!(
            "No HTML reports found in {}",
            ctx.report_path(&config.html_report_dir).display()
        );
    } else {
        println!("HTML reports:");
        for report in &reports {
            println!("  {}", report.display());
        }
    }
    Ok(())
}
