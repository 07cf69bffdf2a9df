//! Config struct definition and default implementation.

use super::types::*;
use crate::guard::MatchMode;
use serde::{Deserialize, Serialize};

/// Configuration for clairscan.
///
/// This struct represents the contents of `clairscan.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Container settings
    // =========================================================================
    /// Container runtime executable.
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// Seconds to wait after starting or resuming any service.
    #[serde(default = "default_settle_seconds")]
    pub settle_seconds: u64,

    /// Vulnerability database container.
    #[serde(default = "default_database")]
    pub database: ServiceSpec,

    /// Scan engine container (linked to the database).
    #[serde(default = "default_engine")]
    pub engine: ServiceSpec,

    // =========================================================================
    // Binary settings
    // =========================================================================
    /// How the guard matches binary file names.
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Client producing HTML reports (push/analyze/report).
    #[serde(default = "default_clairctl")]
    pub clairctl: BinarySpec,

    /// Client producing JSON reports (single scan with threshold).
    #[serde(default = "default_clair_scanner")]
    pub clair_scanner: BinarySpec,

    /// Timeout for each HTTP request (downloads, health checks).
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,

    // =========================================================================
    // Scan settings
    // =========================================================================
    /// Scan engine API address.
    #[serde(default = "default_clair_url")]
    pub clair_url: String,

    /// Scan engine health endpoint.
    #[serde(default = "default_health_url")]
    pub health_url: String,

    /// Address of this host as seen from the engine container.
    #[serde(default = "default_reporter_ip")]
    pub reporter_ip: String,

    /// Default severity threshold for JSON scans.
    #[serde(default = "default_threshold")]
    pub threshold: Severity,

    /// Default JSON report path, relative to the working directory.
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Directory where HTML reports are written, relative to the working directory.
    #[serde(default = "default_html_report_dir")]
    pub html_report_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_bin: default_docker_bin(),
            settle_seconds: default_settle_seconds(),
            database: default_database(),
            engine: default_engine(),
            match_mode: MatchMode::default(),
            clairctl: default_clairctl(),
            clair_scanner: default_clair_scanner(),
            http_timeout_seconds: default_http_timeout_seconds(),
            clair_url: default_clair_url(),
            health_url: default_health_url(),
            reporter_ip: default_reporter_ip(),
            threshold: default_threshold(),
            report_file: default_report_file(),
            html_report_dir: default_html_report_dir(),
        }
    }
}
