//! Implementation of the `clairscan fetch` command.

use crate::cli::FetchArgs;
use crate::config::Config;
use crate::context::ScanContext;
use crate::error::Result;
use crate::fetch::{FetchOutcome, acquire};

pub fn cmd_fetch(ctx: &ScanContext, config: &Config, args: FetchArgs) -> Result<()> {
    let spec = args.scanner.spec(config);
    match acquire(ctx, config, spec, args.force)? {
        FetchOutcome::AlreadyPresent => {
            println!(
                "{} already present in {}; use --force to download again",
                spec.name,
                ctx.work_dir.display()
            );
        }
        FetchOutcome::Downloaded { .. } => {}
    }
    Ok(())
}
