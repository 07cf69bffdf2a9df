//! End-to-end tests for command handlers.

use super::*;
use crate::cli::{CheckArgs, FetchArgs, HistoryArgs, ReportArgs, ScanArgs};
use crate::config::{Config, Severity};
use crate::error::ScanError;
use crate::events::{EventAction, read_events};
use crate::exit_codes;
use crate::guard::{MatchMode, ResourceState};
use crate::scanners::ScannerKind;
use std::fs;
use tempfile::TempDir;

fn context(temp_dir: &TempDir) -> ScanContext {
    ScanContext::resolve_from(temp_dir.path(), None, None).unwrap()
}

fn check_args(name: Option<&str>, substring: bool) -> CheckArgs {
    CheckArgs {
        name: name.map(str::to_string),
        substring,
    }
}

#[test]
fn test_check_absent_and_present() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);
    let config = Config::default();
    let args = check_args(Some("clairctl"), false);

    assert_eq!(
        check::check_state(&ctx, &config, &args).unwrap(),
        ResourceState::Absent
    );
    check::cmd_check(&ctx, &config, check_args(Some("clairctl"), false)).unwrap();

    fs::write(temp_dir.path().join("clairctl"), "bin").unwrap();
    assert_eq!(
        check::check_state(&ctx, &config, &args).unwrap(),
        ResourceState::Present
    );
    check::cmd_check(&ctx, &config, args).unwrap();
}

#[test]
fn test_check_conflict_exits_with_conflict_code() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("clairctl")).unwrap();
    let ctx = context(&temp_dir);

    let err = check::cmd_check(&ctx, &Config::default(), check_args(Some("clairctl"), false))
        .unwrap_err();
    assert!(matches!(err, ScanError::Conflict { .. }));
    assert_eq!(err.exit_code(), exit_codes::CONFLICT);
}

#[test]
fn test_check_without_name_is_input_error() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    let err = check::cmd_check(&ctx, &Config::default(), check_args(None, false)).unwrap_err();
    assert!(matches!(err, ScanError::InputError(_)));
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_check_substring_flag_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clairctl-linux-amd64"), "bin").unwrap();
    let ctx = context(&temp_dir);

    let config = Config::default();

    assert_eq!(
        check::check_state(&ctx, &config, &check_args(Some("clairctl"), false)).unwrap(),
        ResourceState::Absent
    );
    assert_eq!(
        check::check_state(&ctx, &config, &check_args(Some("clairctl"), true)).unwrap(),
        ResourceState::Present
    );
}

#[test]
fn test_check_follows_configured_match_mode() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("clairctl-linux-amd64"), "bin").unwrap();
    let ctx = context(&temp_dir);
    let config = Config {
        match_mode: MatchMode::Substring,
        ..Config::default()
    };

    assert_eq!(
        check::check_state(&ctx, &config, &check_args(Some("clairctl"), false)).unwrap(),
        ResourceState::Present
    );
}

#[test]
fn test_fetch_reports_conflict() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("clair-scanner")).unwrap();
    let ctx = context(&temp_dir);

    let args = FetchArgs {
        scanner: ScannerKind::ClairScanner,
        force: false,
    };
    let err = fetch::cmd_fetch(&ctx, &Config::default(), args).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::CONFLICT);
}

#[test]
fn test_fetch_unreachable_source_is_fetch_failure() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);
    let mut config = Config::default();
    config.clairctl.url = format!("file://{}", temp_dir.path().join("missing").display());

    let args = FetchArgs {
        scanner: ScannerKind::Clairctl,
        force: false,
    };
    let err = fetch::cmd_fetch(&ctx, &config, args).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::FETCH_FAILURE);
    assert!(!temp_dir.path().join("clairctl").exists());
}

#[test]
fn test_history_with_no_events() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    history::cmd_history(&ctx, HistoryArgs { tail: 20 }).unwrap();
}

#[test]
fn test_format_event_includes_image_and_details() {
    let event = crate::events::Event::new(EventAction::Scan)
        .with_image("nginx:1.25")
        .with_details(serde_json::json!({"status": 0}));

    let line = history::format_event(&event);
    assert!(line.contains("scan"));
    assert!(line.contains("nginx:1.25"));
    assert!(line.contains(r#"{"status":0}"#));
}

#[cfg(unix)]
mod flows {
    use super::*;
    use crate::test_support::{FakeDocker, fake_scanner, scanner_calls, serve_status};

    /// A working directory, a fake runtime with both services missing, and a
    /// mirror holding fake scanner clients reachable through `file://` URLs.
    struct Fixture {
        work: TempDir,
        mirror: TempDir,
        fake: FakeDocker,
        ctx: ScanContext,
        config: Config,
    }

    fn fixture(scanner_exit: i32) -> Fixture {
        let work = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        let fake = FakeDocker::new(mirror.path());
        let clairctl = fake_scanner(mirror.path(), "clairctl", scanner_exit);
        let clair_scanner = fake_scanner(mirror.path(), "clair-scanner", scanner_exit);

        let mut config = Config {
            docker_bin: fake.bin_str(),
            settle_seconds: 0,
            ..Config::default()
        };
        config.clairctl.url = format!("file://{}", clairctl.display());
        config.clair_scanner.url = format!("file://{}", clair_scanner.display());

        let ctx = context(&work);
        Fixture {
            work,
            mirror,
            fake,
            ctx,
            config,
        }
    }

    #[test]
    fn test_up_creates_database_before_engine() {
        let f = fixture(0);

        up::cmd_up(&f.ctx, &f.config).unwrap();

        let runs: Vec<_> = f
            .fake
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("run "))
            .collect();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].contains("--name db"));
        assert!(runs[1].contains("--name clair"));
        assert!(runs[1].contains("--link db:postgres"));
    }

    #[test]
    fn test_up_failure_is_container_failure() {
        let f = fixture(0);
        f.fake.set_failing();

        let err = up::cmd_up(&f.ctx, &f.config).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::CONTAINER_FAILURE);
    }

    #[test]
    fn test_scan_starts_services_fetches_and_scans() {
        let mut f = fixture(0);
        f.config.health_url = format!("{}/health", serve_status(200, 1));

        let args = ScanArgs {
            image: Some("nginx:1.25".to_string()),
            threshold: Some(Severity::Critical),
            output: Some("out/report.json".into()),
        };
        fs::create_dir(f.work.path().join("out")).unwrap();
        scan::cmd_scan(&f.ctx, &f.config, args).unwrap();

        assert!(f.work.path().join("clair-scanner").is_file());
        let calls = scanner_calls(f.mirror.path(), "clair-scanner");
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("-t Critical"));
        assert!(calls[0].contains(&format!(
            "-r {}",
            f.work.path().join("out/report.json").display()
        )));

        let actions: Vec<_> = read_events(&f.ctx)
            .unwrap()
            .iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                EventAction::ServiceCreate,
                EventAction::ServiceCreate,
                EventAction::Fetch,
                EventAction::Health,
                EventAction::Scan
            ]
        );
    }

    #[test]
    fn test_scan_propagates_scanner_status() {
        let mut f = fixture(3);
        f.fake.set_running("db", true);
        f.fake.set_running("clair", true);
        f.config.health_url = format!("{}/health", serve_status(200, 1));

        let args = ScanArgs {
            image: Some("nginx:1.25".to_string()),
            threshold: None,
            output: None,
        };
        let err = scan::cmd_scan(&f.ctx, &f.config, args).unwrap_err();
        assert!(matches!(err, ScanError::ToolFailed { code: 3, .. }));
        assert_eq!(err.exit_code(), 3);

        let calls = scanner_calls(f.mirror.path(), "clair-scanner");
        assert!(calls[0].contains("-t High"));
        // Running services are left alone.
        assert!(!f.fake.calls().iter().any(|c| c.starts_with("run ")));
    }

    #[test]
    fn test_scan_aborts_on_binary_conflict() {
        let f = fixture(0);
        fs::create_dir(f.work.path().join("clair-scanner")).unwrap();

        let args = ScanArgs {
            image: Some("nginx:1.25".to_string()),
            threshold: None,
            output: None,
        };
        let err = scan::cmd_scan(&f.ctx, &f.config, args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::CONFLICT);
        assert!(scanner_calls(f.mirror.path(), "clair-scanner").is_empty());
    }

    #[test]
    fn test_report_runs_html_flow() {
        let f = fixture(0);
        f.fake.set_running("db", true);
        f.fake.set_running("clair", false);

        let args = ReportArgs {
            image: Some("alpine:3.19".to_string()),
        };
        report::cmd_report(&f.ctx, &f.config, args).unwrap();

        assert!(f.fake.calls().iter().any(|c| c == "start clair"));
        assert_eq!(
            scanner_calls(f.mirror.path(), "clairctl"),
            vec![
                "health",
                "push alpine:3.19",
                "analyze alpine:3.19",
                "report alpine:3.19"
            ]
        );
    }

    #[test]
    fn test_report_reuses_present_binary() {
        let f = fixture(0);
        f.fake.set_running("db", true);
        f.fake.set_running("clair", true);
        fake_scanner(f.work.path(), "clairctl", 0);

        report::cmd_report(&f.ctx, &f.config, ReportArgs { image: None }).unwrap();

        // The local binary ran; the mirror copy was never downloaded or run.
        assert_eq!(scanner_calls(f.work.path(), "clairctl"), vec!["health"]);
        assert!(scanner_calls(f.mirror.path(), "clairctl").is_empty());
        assert!(
            !read_events(&f.ctx)
                .unwrap()
                .iter()
                .any(|e| e.action == EventAction::Fetch)
        );
    }

    #[test]
    fn test_history_after_fetch() {
        let f = fixture(0);

        let args = FetchArgs {
            scanner: ScannerKind::Clairctl,
            force: false,
        };
        fetch::cmd_fetch(&f.ctx, &f.config, args).unwrap();
        history::cmd_history(&f.ctx, HistoryArgs { tail: 0 }).unwrap();

        let events = read_events(&f.ctx).unwrap();
        assert_eq!(events.len(), 1);
        assert!(history::format_event(&events[0]).contains("fetch"));
    }
}
