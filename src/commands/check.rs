//! Implementation of the `clairscan check` command.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use crate::guard::{self, MatchMode, ResourceState};

/// Classify the named resource; `--substring` overrides the configured mode.
pub fn check_state(ctx: &ScanContext, config: &Config, args: &CheckArgs) -> Result<ResourceState> {
    let name = args.name.as_deref().unwrap_or_default();
    let mode = if args.substring {
        MatchMode::Substring
    } else {
        config.match_mode
    };

    guard::check(&ctx.work_dir, name, mode)
}

/// Print the resource state; a conflict is also an error (exit 2).
pub fn cmd_check(ctx: &ScanContext, config: &Config, args: CheckArgs) -> Result<()> {
    let state = check_state(ctx, config, &args)?;
    println!("{}", state);

    if state == ResourceState::Conflict {
        return Err(ScanError::Conflict {
            name: args.name.unwrap_or_default(),
            dir: ctx.work_dir.display().to_string(),
        });
    }
    Ok(())
}
