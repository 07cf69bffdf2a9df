//! Container runtime command runner for clairscan.
//!
//! Provides a wrapper around `docker` invocations with captured stdout/stderr
//! and structured error handling. All container operations go through this
//! module.

use crate::config::ServiceSpec;
use crate::error::{Result, ScanError};
use std::process::{Command, Output};

/// Result of a successful runtime command execution.
#[derive(Debug, Clone)]
pub struct DockerOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl DockerOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Observed state of a named container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// The container exists and is running.
    Running,
    /// The container exists but is not running.
    Stopped,
    /// No container with this name exists.
    Missing,
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerState::Running => write!(f, "running"),
            ContainerState::Stopped => write!(f, "stopped"),
            ContainerState::Missing => write!(f, "missing"),
        }
    }
}

/// Handle on the container runtime executable.
#[derive(Debug, Clone)]
pub struct Docker {
    bin: String,
}

impl Docker {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run a runtime command.
    ///
    /// # Returns
    ///
    /// * `Ok(DockerOutput)` - On successful execution (exit code 0)
    /// * `Err(ScanError::ContainerError)` - On spawn failure or non-zero exit code
    pub fn run(&self, args: &[&str]) -> Result<DockerOutput> {
        let output = self.output(args)?;
        let docker_output = DockerOutput::from_output(&output);

        if output.status.success() {
            Ok(docker_output)
        } else {
            Err(self.failure(args, &output, &docker_output))
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(bin = %self.bin, ?args, "running container runtime");
        Command::new(&self.bin).args(args).output().map_err(|e| {
            ScanError::ContainerError(format!(
                "failed to execute {} {}: {} (is the container runtime installed?)",
                self.bin,
                args.first().unwrap_or(&""),
                e
            ))
        })
    }

    fn failure(&self, args: &[&str], output: &Output, docker_output: &DockerOutput) -> ScanError {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if docker_output.stderr.is_empty() {
            &docker_output.stdout
        } else {
            &docker_output.stderr
        };

        ScanError::ContainerError(format!(
            "{} {} failed (exit code {}): {}",
            self.bin,
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        ))
    }

    /// Server version, used to check that the runtime is reachable.
    pub fn version(&self) -> Result<String> {
        let output = self.run(&["version", "--format", "{{.Server.Version}}"])?;
        Ok(output.stdout)
    }

    /// Inspect the state of a named container.
    pub fn container_state(&self, name: &str) -> Result<ContainerState> {
        let args = ["inspect", "--format", "{{.State.Running}}", name];
        let output = self.output(&args)?;
        let docker_output = DockerOutput::from_output(&output);

        if !output.status.success() {
            if is_missing_container(&docker_output.stderr) {
                return Ok(ContainerState::Missing);
            }
            return Err(self.failure(&args, &output, &docker_output));
        }

        match docker_output.stdout.as_str() {
            "true" => Ok(ContainerState::Running),
            "false" => Ok(ContainerState::Stopped),
            other => Err(ScanError::ContainerError(format!(
                "unexpected inspect output for container '{}': {}",
                name, other
            ))),
        }
    }

    /// Create and start a detached container from its spec.
    pub fn run_container(&self, spec: &ServiceSpec) -> Result<()> {
        let args = run_args(spec);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args)?;
        Ok(())
    }

    /// Start an existing, stopped container.
    pub fn start_container(&self, name: &str) -> Result<()> {
        self.run(&["start", name])?;
        Ok(())
    }
}

/// Arguments for `docker run` creating the service container.
fn run_args(spec: &ServiceSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        spec.name.clone(),
    ];
    for port in &spec.ports {
        args.push("-p".to_string());
        args.push(port.clone());
    }
    for link in &spec.links {
        args.push("--link".to_string());
        args.push(link.clone());
    }
    args.push(spec.image.clone());
    args
}

fn is_missing_container(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("no such object") || stderr.contains("no such container")
}
