//! HTML report flow: `health`, then `push`, `analyze` and `report` on an image.

use crate::config::Config;
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use crate::events::{Event, EventAction, record_event};
use crate::runner::Tool;
use serde_json::json;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Steps run against an image, in order.
const IMAGE_STEPS: [(&str, EventAction); 3] = [
    ("push", EventAction::Push),
    ("analyze", EventAction::Analyze),
    ("report", EventAction::Report),
];

/// Ask the client whether it can reach the engine.
pub fn health(ctx: &ScanContext, tool: &Tool) -> Result<()> {
    tool.run(&["health"]).map_err(|e| match e {
        ScanError::ToolFailed { tool, code } => ScanError::ScannerError(format!(
            "{} health check failed (status {}); is the scan engine running?",
            tool, code
        )),
        other => other,
    })?;
    record_event(
        ctx,
        &Event::new(EventAction::Health).with_details(json!({"tool": tool.name()})),
    );
    Ok(())
}

/// Run the flow. Without an image only the health check runs.
///
/// Returns the HTML reports found afterwards.
pub fn run(ctx: &ScanContext, config: &Config, image: Option<&str>) -> Result<Vec<PathBuf>> {
    let tool = Tool::new(ctx, &config.clairctl)?;

    health(ctx, &tool)?;
    println!("[+] {} is healthy", tool.name());

    let Some(image) = image else {
        return Ok(Vec::new());
    };

    for (step, action) in IMAGE_STEPS {
        println!("[+] {} {} {}", tool.name(), step, image);
        tool.run(&[step, image])?;
        record_event(
            ctx,
            &Event::new(action)
                .with_image(image)
                .with_details(json!({"tool": tool.name()})),
        );
    }

    html_reports(&ctx.report_path(&config.html_report_dir))
}

/// HTML files directly inside `dir`, sorted. A missing directory has none.
pub fn html_reports(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ScanError::UserError(format!(
                "failed to read report directory '{}': {}",
                dir.display(),
                e
            )));
        }
    };

    let mut reports: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
        .collect();
    reports.sort();
    Ok(reports)
}
