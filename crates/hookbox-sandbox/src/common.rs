//! Shared process helpers: output capture and the optional wall-clock limit.

use std::io::{self, Read};
use std::process::{Child, ExitStatus};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while a timeout is armed.
pub const WAIT_POLL_INTERVAL_MS: u64 = 50;

/// After a kill, grandchildren may still hold the pipes open; stop waiting
/// for their output after this long.
pub const DRAIN_GRACE_MS: u64 = 1000;

/// Exit code reported when the process has no code (signal, kill on timeout).
pub const NO_EXIT_CODE: i32 = -1;

/// What [`wait_with_timeout`] observed.
#[derive(Debug)]
pub struct WaitOutcome {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed on timeout.
    pub status: Option<ExitStatus>,
    pub timed_out: bool,
}

impl WaitOutcome {
    pub fn exit_code(&self) -> i32 {
        self.status
            .and_then(|s| s.code())
            .unwrap_or(NO_EXIT_CODE)
    }
}

/// Wait for `child`, capturing stdout/stderr, optionally killing it after `timeout`.
///
/// stdout/stderr are drained on background threads while the child runs.
/// Without that, a child writing more than a pipe buffer (~64KB) blocks on
/// write and we deadlock waiting for it to exit.
pub fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> io::Result<WaitOutcome> {
    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    let (status, timed_out) = match timeout {
        None => (Some(child.wait()?), false),
        Some(limit) => {
            let start = Instant::now();
            let interval = Duration::from_millis(WAIT_POLL_INTERVAL_MS);
            loop {
                if let Some(status) = child.try_wait()? {
                    break (Some(status), false);
                }
                if start.elapsed() >= limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    break (None, true);
                }
                thread::sleep(interval);
            }
        }
    };

    let grace = timed_out.then(|| Duration::from_millis(DRAIN_GRACE_MS));
    Ok(WaitOutcome {
        stdout: collect_reader(stdout_handle, grace),
        stderr: collect_reader(stderr_handle, grace),
        status,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

fn collect_reader(rx: Option<Receiver<Vec<u8>>>, grace: Option<Duration>) -> String {
    let Some(rx) = rx else {
        return String::new();
    };
    let bytes = match grace {
        Some(limit) => rx.recv_timeout(limit).ok(),
        None => rx.recv().ok(),
    };
    bytes
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default()
}
