//! Display and reporting functions for the doctor command.

use super::{DoctorReport, IssueSeverity};

/// Print the doctor report.
pub fn print_report(report: &DoctorReport) {
    print!("{}", render_report(report));
}

pub fn render_report(report: &DoctorReport) -> String {
    if !report.has_issues() {
        return "Environment is healthy. No issues detected.\n".to_string();
    }

    let mut out = format!("Issues detected ({}):\n\n", report.issues.len());
    for (i, issue) in report.issues.iter().enumerate() {
        out.push_str(&format!(
            "  {}. [{}] {} - {}\n",
            i + 1,
            issue.severity,
            issue.category,
            issue.description
        ));

        if let Some(path) = &issue.path {
            out.push_str(&format!("     Path: {}\n", path));
        }

        if let Some(remediation) = &issue.remediation {
            out.push_str(&format!("     Fix:  {}\n", remediation));
        }

        out.push('\n');
    }

    out.push_str(&format!(
        "Summary: {} errors, {} warnings.\n",
        report.count(IssueSeverity::Error),
        report.count(IssueSeverity::Warning)
    ));
    out
}
