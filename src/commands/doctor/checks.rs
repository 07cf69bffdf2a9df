//! Health check functions for the doctor command.

use crate::config::Config;
use crate::context::ScanContext;
use crate::docker::{ContainerState, Docker};
use crate::fetch::is_executable;
use crate::guard::{self, ResourceState};
use crate::scanners::ScannerKind;

use super::{DoctorReport, Issue, IssueSeverity};

/// Load the config; an invalid one becomes an issue.
pub fn check_config(ctx: &ScanContext, report: &mut DoctorReport) -> Option<Config> {
    match ctx.load_config() {
        Ok(config) => Some(config),
        Err(e) => {
            report.issues.push(
                Issue::new(IssueSeverity::Error, "config_invalid", &e.to_string())
                    .with_path(&ctx.config_path.display().to_string())
                    .with_remediation("Fix the config file; remaining checks use defaults"),
            );
            None
        }
    }
}

/// Check that the container runtime answers. Returns whether it does.
pub fn check_runtime(config: &Config, report: &mut DoctorReport) -> bool {
    match Docker::new(&config.docker_bin).version() {
        Ok(version) => {
            tracing::info!(%version, "container runtime reachable");
            true
        }
        Err(e) => {
            report.issues.push(
                Issue::new(IssueSeverity::Error, "runtime_unreachable", &e.to_string())
                    .with_path(&config.docker_bin)
                    .with_remediation("Start the Docker daemon, or set docker_bin in the config"),
            );
            false
        }
    }
}

/// Check the state of each service container.
pub fn check_services(config: &Config, report: &mut DoctorReport) {
    let docker = Docker::new(&config.docker_bin);

    for spec in [&config.database, &config.engine] {
        match docker.container_state(&spec.name) {
            Ok(ContainerState::Running) => {}
            Ok(ContainerState::Stopped) => report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "service_stopped",
                    &format!("Container '{}' exists but is not running", spec.name),
                )
                .with_remediation("clairscan up"),
            ),
            Ok(ContainerState::Missing) => report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "service_missing",
                    &format!("Container '{}' does not exist ({})", spec.name, spec.image),
                )
                .with_remediation("clairscan up"),
            ),
            Err(e) => report.issues.push(Issue::new(
                IssueSeverity::Error,
                "service_unknown",
                &format!("Could not inspect container '{}': {}", spec.name, e),
            )),
        }
    }
}

/// Check each scanner binary in the working directory.
pub fn check_binaries(ctx: &ScanContext, config: &Config, report: &mut DoctorReport) {
    for kind in [ScannerKind::Clairctl, ScannerKind::ClairScanner] {
        let spec = kind.spec(config);
        let path = ctx.binary_path(&spec.name);
        let path_str = path.display().to_string();

        let state = match guard::check(&ctx.work_dir, &spec.name, config.match_mode) {
            Ok(state) => state,
            Err(e) => {
                report.issues.push(
                    Issue::new(IssueSeverity::Error, "binary_unknown", &e.to_string())
                        .with_path(&path_str),
                );
                continue;
            }
        };

        match state {
            ResourceState::Conflict => report.issues.push(
                Issue::new(
                    IssueSeverity::Error,
                    "binary_conflict",
                    &format!("A directory named '{}' blocks the {} binary", spec.name, kind),
                )
                .with_path(&path_str)
                .with_remediation("Remove or rename the directory"),
            ),
            ResourceState::Absent => report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "binary_missing",
                    &format!("{} has not been fetched", spec.name),
                )
                .with_path(&path_str)
                .with_remediation(&format!("clairscan fetch {}", kind)),
            ),
            ResourceState::Present if !path.is_file() => report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "binary_name_mismatch",
                    &format!(
                        "Only a similarly named file matches '{}' (substring match mode)",
                        spec.name
                    ),
                )
                .with_path(&path_str)
                .with_remediation(&format!("clairscan fetch {} --force", kind)),
            ),
            ResourceState::Present if !is_executable(&path) => report.issues.push(
                Issue::new(
                    IssueSeverity::Error,
                    "binary_not_executable",
                    &format!("{} is not executable", spec.name),
                )
                .with_path(&path_str)
                .with_remediation(&format!("chmod +x {}", path_str)),
            ),
            ResourceState::Present => {}
        }
    }
}
