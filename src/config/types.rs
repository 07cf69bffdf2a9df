//! Configuration types and defaults for clairscan.
//!
//! This module defines the service/binary descriptions, the severity scale,
//! and the default value functions used by the Config struct.

use serde::{Deserialize, Serialize};

/// A long-running container the scanners depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Container name (also used to find an existing container).
    pub name: String,

    /// Image to run when the container does not exist yet.
    pub image: String,

    /// Port mappings passed as `-p` (e.g. `6060:6060`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,

    /// Container links passed as `--link` (e.g. `db:postgres`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl ServiceSpec {
    fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ports: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// A scanner client binary fetched from a pinned release URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySpec {
    /// Canonical file name inside the working directory.
    pub name: String,

    /// Versioned release URL (`https://`, `http://` or `file://`).
    pub url: String,

    /// Extra arguments placed before every subcommand (shell-words syntax).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_args: String,
}

impl BinarySpec {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            extra_args: String::new(),
        }
    }
}

/// Vulnerability severity, lowest first.
///
/// The derived ordering is the severity ordering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Unknown,
    Negligible,
    Low,
    Medium,
    High,
    Critical,
    Defcon1,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 7] = [
        Severity::Unknown,
        Severity::Negligible,
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
        Severity::Defcon1,
    ];

    /// Parse a severity as written in scanner reports (case-insensitive).
    ///
    /// Anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "negligible" => Severity::Negligible,
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            "defcon1" => Severity::Defcon1,
            _ => Severity::Unknown,
        }
    }

    /// Spelling expected by the scanner's `-t` flag.
    pub fn as_scanner_arg(self) -> &'static str {
        match self {
            Severity::Unknown => "Unknown",
            Severity::Negligible => "Negligible",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Defcon1 => "Defcon1",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_scanner_arg())
    }
}

// Default value functions for serde
pub(crate) fn default_docker_bin() -> String {
    "docker".to_string()
}
pub(crate) fn default_settle_seconds() -> u64 {
    5
}
pub(crate) fn default_database() -> ServiceSpec {
    ServiceSpec::new("db", "arminc/clair-db:latest")
}
pub(crate) fn default_engine() -> ServiceSpec {
    let mut spec = ServiceSpec::new("clair", "arminc/clair-local-scan:latest");
    spec.ports = vec!["6060:6060".to_string()];
    spec.links = vec!["db:postgres".to_string()];
    spec
}
pub(crate) fn default_clairctl() -> BinarySpec {
    BinarySpec::new(
        "clairctl",
        "https://github.com/jgsqware/clairctl/releases/download/v1.2.8/clairctl-linux-amd64",
    )
}
pub(crate) fn default_clair_scanner() -> BinarySpec {
    BinarySpec::new(
        "clair-scanner",
        "https://github.com/arminc/clair-scanner/releases/download/v12/clair-scanner_linux_amd64",
    )
}
pub(crate) fn default_clair_url() -> String {
    "http://localhost:6060".to_string()
}
pub(crate) fn default_health_url() -> String {
    "http://localhost:6061/health".to_string()
}
pub(crate) fn default_reporter_ip() -> String {
    "172.17.0.1".to_string()
}
pub(crate) fn default_threshold() -> Severity {
    Severity::High
}
pub(crate) fn default_report_file() -> String {
    "clair-report.json".to_string()
}
pub(crate) fn default_html_report_dir() -> String {
    "reports/html".to_string()
}
pub(crate) fn default_http_timeout_seconds() -> u64 {
    120
}
