use crate::config::RemoteConfig;
use crate::error::{FetchError, FetchResult};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const WAIT_STEP: Duration = Duration::from_millis(100);

/// Run the controller query on `host` over ssh and return its stdout.
///
/// Empty output is an error: ssh prints nothing on stdout when the host is
/// down or authentication fails, and the reason is kept from stderr.
pub fn query(cfg: &RemoteConfig, host: &str) -> FetchResult<String> {
    let mut cmd = Command::new(&cfg.ssh);
    cmd.args(["-o", "BatchMode=yes", "-o"])
        .arg(format!("ConnectTimeout={}", cfg.connect_timeout_secs))
        .arg(host)
        .arg(&cfg.command);
    debug!(host, command = %cfg.command, "running remote controller query");
    run_with_timeout(cmd, Duration::from_secs(cfg.timeout_secs.max(1)))
}

/// Spawn `cmd`, drain both pipes, and kill it if it outlives `timeout`.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> FetchResult<String> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| FetchError::Spawn { program, source })?;

    // Pipes are drained off-thread so a chatty child cannot block on a full
    // pipe while we wait for it to exit.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() { break; }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(FetchError::Timeout { secs: timeout.as_secs() });
        }
        thread::sleep(WAIT_STEP);
    }

    let out = stdout.join().unwrap_or_default();
    let err = stderr.join().unwrap_or_default();
    if out.trim().is_empty() {
        return Err(FetchError::Empty { stderr: err.trim().to_string() });
    }
    Ok(out)
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
