//! JSON scan report model and console summary.

use crate::config::Severity;
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One vulnerable feature as written by the JSON-flow scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    pub featurename: String,
    pub featureversion: String,
    pub vulnerability: String,
    pub namespace: String,
    pub description: String,
    pub link: String,
    pub severity: String,
    pub fixedby: String,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.severity)
    }
}

/// Report file contents. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanReport {
    pub image: String,
    pub unapproved: Vec<String>,
    pub vulnerabilities: Vec<Finding>,
}

impl ScanReport {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::UserError(format!("failed to read report '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| {
            ScanError::UserError(format!("failed to parse report '{}': {}", path.display(), e))
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Summarize against `threshold`.
    pub fn summarize(&self, threshold: Severity) -> ReportSummary<'_> {
        let mut counts = BTreeMap::new();
        for finding in &self.vulnerabilities {
            *counts.entry(finding.severity()).or_insert(0) += 1;
        }

        let mut blocking: Vec<&Finding> = self
            .vulnerabilities
            .iter()
            .filter(|f| f.severity() >= threshold)
            .collect();
        blocking.sort_by(|a, b| {
            b.severity()
                .cmp(&a.severity())
                .then_with(|| a.vulnerability.cmp(&b.vulnerability))
                .then_with(|| a.featurename.cmp(&b.featurename))
        });

        ReportSummary {
            image: &self.image,
            threshold,
            total: self.vulnerabilities.len(),
            unapproved: self.unapproved.len(),
            counts,
            blocking,
        }
    }
}

/// Counts per severity and the findings at or above the threshold.
#[derive(Debug)]
pub struct ReportSummary<'a> {
    pub image: &'a str,
    pub threshold: Severity,
    pub total: usize,
    pub unapproved: usize,
    pub counts: BTreeMap<Severity, usize>,
    /// Most severe first.
    pub blocking: Vec<&'a Finding>,
}

impl ReportSummary<'_> {
    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    /// Render the summary for the console.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Scan summary for {}\n",
            if self.image.is_empty() { "<unknown image>" } else { self.image }
        ));
        out.push_str(&format!(
            "  {} vulnerabilities, {} unapproved\n",
            self.total, self.unapproved
        ));

        for severity in Severity::ALL.iter().rev() {
            let count = self.count(*severity);
            if count > 0 {
                out.push_str(&format!("  {:<10} {}\n", severity.as_scanner_arg(), count));
            }
        }

        if self.blocking.is_empty() {
            out.push_str(&format!("No findings at or above {}.\n", self.threshold));
        } else {
            out.push_str(&format!("Findings at or above {}:\n", self.threshold));
            for finding in &self.blocking {
                let fixed = if finding.fixedby.is_empty() {
                    "no fix".to_string()
                } else {
                    format!("fixed by {}", finding.fixedby)
                };
                out.push_str(&format!(
                    "  [{}] {} in {} {} ({})\n",
                    finding.severity().as_scanner_arg(),
                    finding.vulnerability,
                    finding.featurename,
                    finding.featureversion,
                    fixed
                ));
            }
        }
        out
    }
}
