//! Scanner binary acquisition.
//!
//! A binary is only downloaded when the guard reports it absent (or when the
//! operator forces a refresh). Downloads land in a temporary file inside the
//! working directory and are renamed into place, so an interrupted fetch
//! never leaves a truncated binary under the canonical name.

use crate::config::{BinarySpec, Config};
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use crate::events::{Event, EventAction, record_event};
use crate::guard::{self, ResourceState};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// What `acquire` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The binary was already in place; nothing was downloaded.
    AlreadyPresent,
    /// The binary was downloaded and installed.
    Downloaded { bytes: usize },
}

/// Ensure `spec` is available in the working directory.
///
/// # Errors
///
/// * `ScanError::Conflict` - a directory with the binary's name exists; nothing is written
/// * `ScanError::FetchError` - the download failed
/// * `ScanError::UserError` - the binary could not be written
pub fn acquire(
    ctx: &ScanContext,
    config: &Config,
    spec: &BinarySpec,
    force: bool,
) -> Result<FetchOutcome> {
    match guard::check(&ctx.work_dir, &spec.name, config.match_mode)? {
        ResourceState::Conflict => {
            return Err(ScanError::Conflict {
                name: spec.name.clone(),
                dir: ctx.work_dir.display().to_string(),
            });
        }
        ResourceState::Present if !force => {
            if !ctx.binary_path(&spec.name).is_file() {
                tracing::warn!(
                    name = %spec.name,
                    hint = %name_mismatch_hint(&spec.name),
                    "matched a similarly named file; the binary itself is not in place"
                );
            }
            tracing::info!(name = %spec.name, "binary already present");
            return Ok(FetchOutcome::AlreadyPresent);
        }
        ResourceState::Present | ResourceState::Absent => {}
    }

    println!("[+] Downloading {} from {}", spec.name, spec.url);
    let bytes = download(&spec.url, Duration::from_secs(config.http_timeout_seconds))?;
    let path = install(&ctx.work_dir, &spec.name, &bytes)?;
    println!("[+] Installed {} ({} bytes)", path.display(), bytes.len());

    record_event(
        ctx,
        &Event::new(EventAction::Fetch).with_details(json!({
            "name": spec.name,
            "url": spec.url,
            "bytes": bytes.len(),
        })),
    );

    Ok(FetchOutcome::Downloaded { bytes: bytes.len() })
}

/// Remediation when only a similarly named file satisfied a substring match.
fn name_mismatch_hint(name: &str) -> String {
    format!(
        "set `match_mode: exact` in the config, or run `clairscan fetch {} --force`",
        name
    )
}

/// Download a release artifact.
///
/// `http://` and `https://` URLs are fetched over the network; `file://` URLs
/// and bare paths are read from the local filesystem.
pub fn download(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http://") || url.starts_with("https://") {
        download_http(url, timeout)?
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read(path).map_err(|e| {
            ScanError::FetchError(format!("failed to read local artifact '{}': {}", path, e))
        })?
    };

    if bytes.is_empty() {
        return Err(ScanError::FetchError(format!(
            "downloaded artifact from {} is empty",
            url
        )));
    }
    Ok(bytes)
}

fn download_http(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(format!("clairscan/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScanError::FetchError(format!("failed to build HTTP client: {}", e)))?;

    tracing::debug!(%url, "downloading");
    let response = client
        .get(url)
        .send()
        .map_err(|e| ScanError::FetchError(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::FetchError(format!(
            "{} returned HTTP {}",
            url, status
        )));
    }

    let body = response
        .bytes()
        .map_err(|e| ScanError::FetchError(format!("failed to read body from {}: {}", url, e)))?;
    Ok(body.to_vec())
}

/// Write `bytes` to `dir/name` through a temporary file and make it executable.
pub fn install(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let target = dir.join(name);
    let write_err = |e: std::io::Error| {
        ScanError::UserError(format!("failed to write '{}': {}", target.display(), e))
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(bytes).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    make_executable(temp.path()).map_err(write_err)?;

    temp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(target)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Whether the file at `path` can be executed.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
