use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Write an executable shell script.
#[cfg(unix)]
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A stand-in for the container runtime.
///
/// Every invocation is appended to a log. `inspect` answers from per-container
/// state files (`true`/`false`); containers without a state file are missing.
/// Setting the `fail` marker makes `run` and `start` exit non-zero.
#[cfg(unix)]
pub(crate) struct FakeDocker {
    dir: PathBuf,
    pub(crate) bin: PathBuf,
    log: PathBuf,
}

#[cfg(unix)]
impl FakeDocker {
    pub(crate) fn new(dir: &Path) -> Self {
        let dir = dir.join("fake-docker");
        std::fs::create_dir_all(&dir).unwrap();
        let log = dir.join("calls.log");
        let body = format!(
            r#"echo "$*" >> "{dir}/calls.log"
case "$1" in
  inspect)
    if [ -f "{dir}/state-$4" ]; then cat "{dir}/state-$4"; else echo "Error: No such object: $4" >&2; exit 1; fi ;;
  version)
    if [ -f "{dir}/down" ]; then echo "Cannot connect to the Docker daemon" >&2; exit 1; fi
    echo "24.0.7" ;;
  run|start)
    if [ -f "{dir}/fail" ]; then echo "Error response from daemon: boom" >&2; exit 125; fi
    echo "0123456789ab" ;;
esac
"#,
            dir = dir.display()
        );
        let bin = write_script(&dir, "docker", &body);
        Self { dir, bin, log }
    }

    pub(crate) fn set_running(&self, name: &str, running: bool) {
        std::fs::write(self.dir.join(format!("state-{}", name)), running.to_string()).unwrap();
    }

    pub(crate) fn set_failing(&self) {
        std::fs::write(self.dir.join("fail"), "").unwrap();
    }

    pub(crate) fn set_daemon_down(&self) {
        std::fs::write(self.dir.join("down"), "").unwrap();
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub(crate) fn bin_str(&self) -> String {
        self.bin.to_string_lossy().to_string()
    }
}

/// Write a fake scanner client that logs its arguments to `{name}.calls`
/// next to itself and exits with `exit_code`.
#[cfg(unix)]
pub(crate) fn fake_scanner(dir: &Path, name: &str, exit_code: i32) -> PathBuf {
    let body = format!(
        "echo \"$*\" >> \"{}/{}.calls\"\nexit {}\n",
        dir.display(),
        name,
        exit_code
    );
    write_script(dir, name, &body)
}

#[cfg(unix)]
pub(crate) fn scanner_calls(dir: &Path, name: &str) -> Vec<String> {
    std::fs::read_to_string(dir.join(format!("{}.calls", name)))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Serve `count` HTTP requests on a local port with a fixed status line,
/// returning the base URL.
pub(crate) fn serve_status(status: u16, count: usize) -> String {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming().take(count) {
            let Ok(mut stream) = stream else { continue };
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = write!(
                stream,
                "HTTP/1.1 {} STATUS\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                status
            );
        }
    });
    format!("http://{}", addr)
}
