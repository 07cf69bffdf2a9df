//! Implementation of the `clairscan doctor` command.
//!
//! Read-only diagnosis. Reports:
//! - An unreadable or invalid config file
//! - An unreachable container runtime
//! - Service containers that are missing or stopped
//! - Scanner binaries that are absent, blocked by a same-named directory,
//!   or not executable

mod checks;
mod display;


use crate::config::Config;
use crate::context::ScanContext;
use crate::error::{Result, ScanError};

pub use checks::*;
pub use display::*;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Warning: a later command will fix it or it may be intentional.
    Warning,
    /// Error: scans cannot run until this is fixed.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone)]
pub struct Issue {
    /// Severity level.
    pub severity: IssueSeverity,
    /// Category of the issue.
    pub category: String,
    /// Description of the issue.
    pub description: String,
    /// Path or identifier involved.
    pub path: Option<String>,
    /// Recommended remediation command or action.
    pub remediation: Option<String>,
}

impl Issue {
    pub fn new(severity: IssueSeverity, category: &str, description: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            description: description.to_string(),
            path: None,
            remediation: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }
}

/// Result of running the doctor checks.
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// List of detected issues.
    pub issues: Vec<Issue>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    #[cfg(test)]
    pub fn categories(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.category.as_str()).collect()
    }
}

/// Run every check and collect the issues.
///
/// An invalid config is reported and the remaining checks use defaults.
pub fn run_checks(ctx: &ScanContext) -> DoctorReport {
    let mut report = DoctorReport::new();

    let config = check_config(ctx, &mut report).unwrap_or_else(Config::default);
    if check_runtime(&config, &mut report) {
        check_services(&config, &mut report);
    }
    check_binaries(ctx, &config, &mut report);

    report
}

/// Execute the `clairscan doctor` command.
pub fn cmd_doctor(ctx: &ScanContext) -> Result<()> {
    let report = run_checks(ctx);
    print_report(&report);

    if report.has_issues() {
        return Err(ScanError::UserError(format!(
            "Found {} issue(s).",
            report.issues.len()
        )));
    }
    Ok(())
}
