//! Error types for the clairscan CLI.
//!
//! Uses thiserror for derive macros. Every variant maps to one exit code so
//! callers (shell scripts, CI jobs) can branch on the process status.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for clairscan operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A required argument was missing or empty.
    #[error("missing required argument: {0}")]
    InputError(String),

    /// Invalid arguments, invalid config, or a local I/O failure.
    #[error("{0}")]
    UserError(String),

    /// A directory with the same name blocks placing or running the resource.
    #[error(
        "'{name}' is a directory in {dir}; remove or rename it so the {name} binary can be placed there"
    )]
    Conflict { name: String, dir: String },

    /// The container runtime failed.
    #[error("Container operation failed: {0}")]
    ContainerError(String),

    /// Downloading a release artifact failed.
    #[error("Fetch failed: {0}")]
    FetchError(String),

    /// A scanner could not be launched or is not healthy.
    #[error("Scanner failed: {0}")]
    ScannerError(String),

    /// A scanner ran and exited with a non-zero status.
    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },
}

impl ScanError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// `ToolFailed` propagates the tool's own status when it fits in a
    /// process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::InputError(_) => exit_codes::USER_ERROR,
            ScanError::UserError(_) => exit_codes::USER_ERROR,
            ScanError::Conflict { .. } => exit_codes::CONFLICT,
            ScanError::ContainerError(_) => exit_codes::CONTAINER_FAILURE,
            ScanError::FetchError(_) => exit_codes::FETCH_FAILURE,
            ScanError::ScannerError(_) => exit_codes::SCANNER_FAILURE,
            ScanError::ToolFailed { code, .. } if (1..=255).contains(code) => *code,
            ScanError::ToolFailed { .. } => exit_codes::SCANNER_FAILURE,
        }
    }
}

/// Result type alias for clairscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
