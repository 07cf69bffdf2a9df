//! Runs scanner client binaries.
//!
//! Output is inherited so the operator sees the tool's own progress and
//! errors. A non-zero exit becomes `ScanError::ToolFailed` carrying the
//! tool's status.

use crate::config::BinarySpec;
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use std::path::PathBuf;
use std::process::Command;

/// A scanner binary installed in the working directory.
#[derive(Debug, Clone)]
pub struct Tool {
    name: String,
    path: PathBuf,
    work_dir: PathBuf,
    extra_args: Vec<String>,
}

impl Tool {
    pub fn new(ctx: &ScanContext, spec: &BinarySpec) -> Result<Self> {
        Ok(Self {
            name: spec.name.clone(),
            path: ctx.binary_path(&spec.name),
            work_dir: ctx.work_dir.clone(),
            extra_args: spec.extra_args()?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full argument list: configured extra arguments first.
    pub fn argv(&self, args: &[&str]) -> Vec<String> {
        self.extra_args
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }

    /// Run the tool to completion from the working directory.
    pub fn run(&self, args: &[&str]) -> Result<()> {
        let argv = self.argv(args);
        tracing::info!(tool = %self.name, ?argv, "running scanner");

        let status = Command::new(&self.path)
            .args(&argv)
            .current_dir(&self.work_dir)
            .status()
            .map_err(|e| {
                ScanError::ScannerError(format!(
                    "failed to execute '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ScanError::ToolFailed {
                tool: self.name.clone(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
