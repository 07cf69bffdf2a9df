//! JSON report flow: one thresholded scan writing a report file.

use crate::config::{Config, Severity};
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use crate::events::{Event, EventAction, record_event};
use crate::report::ScanReport;
use crate::runner::Tool;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Check the engine's health endpoint.
pub fn engine_health(url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScanError::ScannerError(format!("failed to build HTTP client: {}", e)))?;

    let response = client.get(url).send().map_err(|e| {
        ScanError::ScannerError(format!(
            "scan engine health check at {} failed: {}; is the engine running?",
            url, e
        ))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::ScannerError(format!(
            "scan engine at {} is not healthy (HTTP {})",
            url, status
        )));
    }
    Ok(())
}

/// Arguments for a scan of `image`.
pub fn scan_args(config: &Config, threshold: Severity, report: &Path, image: &str) -> Vec<String> {
    vec![
        "--clair".to_string(),
        config.clair_url.clone(),
        "--ip".to_string(),
        config.reporter_ip.clone(),
        "-t".to_string(),
        threshold.as_scanner_arg().to_string(),
        "-r".to_string(),
        report.display().to_string(),
        image.to_string(),
    ]
}

/// Run the flow. Without an image only the health check runs.
///
/// The report is summarized whenever the scanner left one behind, including
/// when it exits non-zero because findings exceed the threshold; the
/// scanner's status is still returned as the error.
pub fn run(
    ctx: &ScanContext,
    config: &Config,
    image: Option<&str>,
    threshold: Severity,
    report: &Path,
) -> Result<Option<ScanReport>> {
    let tool = Tool::new(ctx, &config.clair_scanner)?;

    engine_health(
        &config.health_url,
        Duration::from_secs(config.http_timeout_seconds),
    )?;
    record_event(
        ctx,
        &Event::new(EventAction::Health).with_details(json!({
            "tool": tool.name(),
            "url": config.health_url,
        })),
    );
    println!("[+] Scan engine is healthy");

    let Some(image) = image else {
        return Ok(None);
    };

    // A stale report from an earlier run must not be mistaken for this one.
    if report.is_file() {
        std::fs::remove_file(report).map_err(|e| {
            ScanError::UserError(format!(
                "failed to remove previous report '{}': {}",
                report.display(),
                e
            ))
        })?;
    }

    println!("[+] {} {} (threshold {})", tool.name(), image, threshold);
    let args = scan_args(config, threshold, report, image);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = tool.run(&args);

    let parsed = if report.is_file() {
        match ScanReport::load(report) {
            Ok(parsed) => {
                print!("{}", parsed.summarize(threshold).render());
                println!("Report written to {}", report.display());
                Some(parsed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not summarize report");
                None
            }
        }
    } else {
        None
    };

    let status = match &result {
        Ok(()) => 0,
        Err(ScanError::ToolFailed { code, .. }) => *code,
        Err(_) => -1,
    };
    record_event(
        ctx,
        &Event::new(EventAction::Scan).with_image(image).with_details(json!({
            "tool": tool.name(),
            "threshold": threshold.as_scanner_arg(),
            "report": report.display().to_string(),
            "status": status,
            "vulnerabilities": parsed.as_ref().map(|r| r.vulnerabilities.len()),
        })),
    );

    result?;
    Ok(parsed)
}
