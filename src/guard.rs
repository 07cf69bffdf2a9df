//! Resource guard.
//!
//! Classifies a named local resource before the caller decides whether to
//! acquire it. The check is advisory: nothing is locked or reserved, and the
//! state is recomputed from the filesystem on every call.

use crate::error::{ScanError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

/// Names accepted by the container runtime; also rules out path separators.
static RESOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
});

/// State of a resource inside a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// A directory with the resource's exact name blocks placement.
    Conflict,
    /// A matching file already exists; acquisition can be skipped.
    Present,
    /// Nothing matches; the resource must be acquired.
    Absent,
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceState::Conflict => write!(f, "conflict"),
            ResourceState::Present => write!(f, "present"),
            ResourceState::Absent => write!(f, "absent"),
        }
    }
}

/// How file names are compared against the resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The file name must equal the resource name.
    #[default]
    Exact,
    /// Any file name containing the resource name matches (`toolkit`
    /// satisfies `tool`). Only for compatibility with older setups.
    Substring,
}

impl MatchMode {
    fn matches(self, file_name: &str, name: &str) -> bool {
        match self {
            MatchMode::Exact => file_name == name,
            MatchMode::Substring => file_name.contains(name),
        }
    }
}

/// Classify `name` within the top level of `dir`.
///
/// A same-named directory always wins over matching files. A missing `dir`
/// behaves like an empty one.
///
/// # Errors
///
/// * `ScanError::InputError` - `name` is empty
/// * `ScanError::UserError` - `dir` exists but cannot be read
pub fn check<P: AsRef<Path>>(dir: P, name: &str, mode: MatchMode) -> Result<ResourceState> {
    if name.is_empty() {
        return Err(ScanError::InputError("resource name".to_string()));
    }

    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ResourceState::Absent),
        Err(e) => {
            return Err(ScanError::UserError(format!(
                "failed to read directory '{}': {}",
                dir.display(),
                e
            )));
        }
    };

    let mut file_match = false;
    for entry in entries {
        let entry = entry.map_err(|e| {
            ScanError::UserError(format!(
                "failed to read entry in '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        // Follows symlinks so a link to a directory counts as a directory.
        let is_dir = entry.path().is_dir();
        if is_dir && file_name == name {
            return Ok(ResourceState::Conflict);
        }
        if !is_dir && mode.matches(file_name, name) {
            file_match = true;
        }
    }

    Ok(if file_match {
        ResourceState::Present
    } else {
        ResourceState::Absent
    })
}

/// Validate a container or binary name.
///
/// Names must be non-empty and use only the characters the container
/// runtime accepts, which also keeps binary names free of path separators.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScanError::InputError("resource name".to_string()));
    }
    if !RESOURCE_NAME.is_match(name) {
        return Err(ScanError::UserError(format!(
            "invalid resource name '{}': use letters, digits, '_', '.' or '-', starting with a letter or digit",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_name_is_input_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = check(temp_dir.path(), "", MatchMode::Exact).unwrap_err();
        assert!(matches!(err, ScanError::InputError(_)));

        let err = check(temp_dir.path(), "", MatchMode::Substring).unwrap_err();
        assert!(matches!(err, ScanError::InputError(_)));
    }

    #[test]
    fn empty_directory_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let state = check(temp_dir.path(), "tool", MatchMode::Exact).unwrap();
        assert_eq!(state, ResourceState::Absent);
    }

    #[test]
    fn missing_directory_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let state = check(&missing, "tool", MatchMode::Exact).unwrap();
        assert_eq!(state, ResourceState::Absent);
    }

    #[test]
    fn matching_file_is_present() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("tool"), "#!/bin/sh\n").unwrap();

        let state = check(temp_dir.path(), "tool", MatchMode::Exact).unwrap();
        assert_eq!(state, ResourceState::Present);
    }

    #[test]
    fn matching_directory_is_conflict() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("tool")).unwrap();

        let state = check(temp_dir.path(), "tool", MatchMode::Exact).unwrap();
        assert_eq!(state, ResourceState::Conflict);
    }

    #[test]
    fn directory_wins_over_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("tool")).unwrap();
        fs::write(temp_dir.path().join("toolkit"), "").unwrap();

        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Substring).unwrap(),
            ResourceState::Conflict
        );
        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Conflict
        );
    }

    #[test]
    fn similarly_named_directory_is_not_conflict() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("toolkit")).unwrap();

        let state = check(temp_dir.path(), "tool", MatchMode::Substring).unwrap();
        assert_eq!(state, ResourceState::Absent);
    }

    #[test]
    fn longer_file_name_depends_on_match_mode() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("toolkit"), "").unwrap();

        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Absent
        );
        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Substring).unwrap(),
            ResourceState::Present
        );
    }

    #[test]
    fn nested_entries_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("bin");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("tool"), "").unwrap();
        fs::create_dir(nested.join("other")).unwrap();

        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Absent
        );
        assert_eq!(
            check(temp_dir.path(), "other", MatchMode::Exact).unwrap(),
            ResourceState::Absent
        );
    }

    #[test]
    fn repeated_checks_are_stable() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("tool"), "").unwrap();

        let first = check(temp_dir.path(), "tool", MatchMode::Exact).unwrap();
        for _ in 0..5 {
            assert_eq!(check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(), first);
        }
    }

    #[test]
    fn state_follows_filesystem_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tool");

        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Absent
        );
        fs::write(&path, "").unwrap();
        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Present
        );
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert_eq!(
            check(temp_dir.path(), "tool", MatchMode::Exact).unwrap(),
            ResourceState::Conflict
        );
    }

    #[test]
    fn state_display_is_lowercase() {
        assert_eq!(ResourceState::Conflict.to_string(), "conflict");
        assert_eq!(ResourceState::Present.to_string(), "present");
        assert_eq!(ResourceState::Absent.to_string(), "absent");
    }

    #[test]
    fn validate_name_accepts_runtime_names() {
        for name in ["db", "clair", "clair-scanner", "clairctl", "scan_1.bin"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn validate_name_rejects_bad_names() {
        assert!(matches!(validate_name(""), Err(ScanError::InputError(_))));
        for name in ["-db", ".hidden", "a/b", "../tool", "has space"] {
            assert!(
                matches!(validate_name(name), Err(ScanError::UserError(_))),
                "{name} should be rejected"
            );
        }
    }
}
