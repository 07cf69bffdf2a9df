//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{BinarySpec, ServiceSpec};
use crate::error::{Result, ScanError};
use crate::guard::validate_name;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ScanError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise use defaults.
    ///
    /// Set `required` when the path was given explicitly by the operator, so a
    /// missing file is an error rather than a silent fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ScanError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ScanError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - service and binary names must be valid resource names
    /// - service images and binary URLs must be non-empty
    /// - `http_timeout_seconds` must be positive
    /// - `extra_args` must split into words
    pub fn validate(&self) -> Result<()> {
        if self.docker_bin.trim().is_empty() {
            return Err(invalid("docker_bin must be non-empty"));
        }

        validate_service("database", &self.database)?;
        validate_service("engine", &self.engine)?;
        if self.database.name == self.engine.name {
            return Err(invalid(&format!(
                "database and engine must use different container names (both are '{}')",
                self.engine.name
            )));
        }

        validate_binary("clairctl", &self.clairctl)?;
        validate_binary("clair_scanner", &self.clair_scanner)?;
        if self.clairctl.name == self.clair_scanner.name {
            return Err(invalid(&format!(
                "clairctl and clair_scanner must use different file names (both are '{}')",
                self.clairctl.name
            )));
        }

        if self.http_timeout_seconds == 0 {
            return Err(invalid("http_timeout_seconds must be greater than 0"));
        }

        if self.report_file.trim().is_empty() {
            return Err(invalid("report_file must be non-empty"));
        }

        Ok(())
    }
}

impl BinarySpec {
    /// Extra arguments split with shell-words rules (no shell involved).
    pub fn extra_args(&self) -> Result<Vec<String>> {
        shell_words::split(&self.extra_args).map_err(|e| {
            ScanError::UserError(format!(
                "failed to parse extra_args for '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.name, e
            ))
        })
    }
}

fn validate_service(field: &str, spec: &ServiceSpec) -> Result<()> {
    validate_name(&spec.name)
        .map_err(|e| invalid(&format!("{}.name: {}", field, e)))?;
    if spec.image.trim().is_empty() {
        return Err(invalid(&format!("{}.image must be non-empty", field)));
    }
    Ok(())
}

fn validate_binary(field: &str, spec: &BinarySpec) -> Result<()> {
    validate_name(&spec.name)
        .map_err(|e| invalid(&format!("{}.name: {}", field, e)))?;
    if spec.url.trim().is_empty() {
        return Err(invalid(&format!("{}.url must be non-empty", field)));
    }
    spec.extra_args()
        .map_err(|e| invalid(&format!("{}.extra_args: {}", field, e)))?;
    Ok(())
}

fn invalid(msg: &str) -> ScanError {
    ScanError::UserError(format!("config validation failed: {}", msg))
}
