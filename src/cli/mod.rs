//! CLI argument parsing for clairscan.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::Severity;
use crate::scanners::ScannerKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Clairscan: scan container images with a local vulnerability database.
///
/// Keeps a database container and a scan-engine container running, fetches
/// a scanner client into the working directory, and runs it against an image.
#[derive(Parser, Debug)]
#[command(name = "clairscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory for binaries, reports and history (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Config file (default: <DIR>/clairscan.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for clairscan.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a resource in the working directory.
    ///
    /// Prints `absent`, `present` or `conflict`. Exits 2 on conflict.
    Check(CheckArgs),

    /// Start the database and scan-engine containers if needed.
    Up,

    /// Download a scanner client into the working directory if absent.
    Fetch(FetchArgs),

    /// Produce an HTML report with clairctl.
    ///
    /// Starts services, fetches clairctl, checks health, then (with an image)
    /// runs push, analyze and report.
    Report(ReportArgs),

    /// Produce a JSON report with clair-scanner.
    ///
    /// Starts services, fetches clair-scanner, checks engine health, then
    /// (with an image) scans against a severity threshold.
    Scan(ScanArgs),

    /// Diagnose the container runtime, services and binaries.
    Doctor,

    /// Show recorded service starts, fetches and scans.
    History(HistoryArgs),
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Resource name to look for.
    pub name: Option<String>,

    /// Accept any file whose name contains NAME.
    #[arg(long)]
    pub substring: bool,
}

/// Arguments for the `fetch` command.
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Scanner client to fetch.
    #[arg(value_enum)]
    pub scanner: ScannerKind,

    /// Download even if the binary is already present.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `report` command.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Image to analyze (e.g., alpine:3.19). Without it only health is checked.
    pub image: Option<String>,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Image to scan (e.g., nginx:1.25). Without it only health is checked.
    pub image: Option<String>,

    /// Lowest severity that fails the scan (default from config).
    #[arg(short, long, value_enum)]
    pub threshold: Option<Severity>,

    /// JSON report path (default from config).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `history` command.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Show the last N events (0 shows all).
    #[arg(long, default_value_t = 20)]
    pub tail: usize,
}
