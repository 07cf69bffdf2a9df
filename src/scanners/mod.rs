//! Scanner client drivers.
//!
//! Two clients are supported: `clairctl` pushes an image to the engine and
//! renders an HTML report, `clair-scanner` runs a single scan against a
//! severity threshold and writes a JSON report.

pub mod clair_scanner;
pub mod clairctl;

use crate::config::{BinarySpec, Config};

/// Which scanner client to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScannerKind {
    /// HTML reports via push/analyze/report.
    Clairctl,
    /// JSON reports via a single thresholded scan.
    ClairScanner,
}

impl ScannerKind {
    /// Binary description for this scanner from the config.
    pub fn spec(self, config: &Config) -> &BinarySpec {
        match self {
            ScannerKind::Clairctl => &config.clairctl,
            ScannerKind::ClairScanner => &config.clair_scanner,
        }
    }
}

impl std::fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerKind::Clairctl => write!(f, "clairctl"),
            ScannerKind::ClairScanner => write!(f, "clair-scanner"),
        }
    }
}
