//! Working-directory context resolution for clairscan.
//!
//! The directory that holds the scanner binaries, reports and history is an
//! explicit value resolved once by the dispatcher (from `--dir` or the process's
//! current directory) and then passed down. Nothing below this module reads
//! the current directory.

use crate::config::Config;
use crate::error::{Result, ScanError};
use std::env;
use std::path::{Path, PathBuf};

/// Default config file name inside the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "clairscan.yaml";

/// Directory for clairscan's own state inside the working directory.
pub const STATE_DIR: &str = ".clairscan";

/// Resolved paths for a clairscan invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Directory where binaries are placed and run, and reports are written.
    pub work_dir: PathBuf,

    /// Config file path.
    pub config_path: PathBuf,

    /// Whether the config path was given explicitly.
    pub config_explicit: bool,

    /// State directory (default: `{work_dir}/.clairscan/`).
    pub state_dir: PathBuf,
}

impl ScanContext {
    /// Resolve the context from optional CLI overrides.
    ///
    /// # Returns
    ///
    /// * `Ok(ScanContext)` - Successfully resolved context
    /// * `Err(ScanError::UserError)` - If the directory does not exist or is not a directory
    pub fn resolve(dir: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ScanError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd, dir, config)
    }

    /// Resolve the context relative to a known base directory.
    pub fn resolve_from<P: AsRef<Path>>(
        base: P,
        dir: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self> {
        let base = base.as_ref();
        let work_dir = match dir {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        };

        if !work_dir.is_dir() {
            return Err(ScanError::UserError(format!(
                "working directory '{}' does not exist or is not a directory",
                work_dir.display()
            )));
        }

        let (config_path, config_explicit) = match config {
            Some(path) => (base.join(path), true),
            None => (work_dir.join(DEFAULT_CONFIG_FILE), false),
        };
        let state_dir = work_dir.join(STATE_DIR);

        Ok(Self {
            work_dir,
            config_path,
            config_explicit,
            state_dir,
        })
    }

    /// Load the config for this context.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_path, self.config_explicit)
    }

    /// Path to the history file.
    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join("events.ndjson")
    }

    /// Path of a binary inside the working directory.
    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Resolve a report path; relative paths are taken from the working directory.
    pub fn report_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.work_dir.join(path)
    }
}
