//! Shell command execution with a timeout.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{SiError, SiResult};

/// Default timeout for one clicast invocation (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    /// Captured stderr.
    pub stderr: String,
    /// Wall-clock duration.
    pub duration: Duration,
}

/// Runs a rendered command line.
///
/// Implementations block until the command finishes. A non-zero exit is a
/// normal `Ok` result; `Err` is reserved for spawn failures and timeouts.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> SiResult<CommandOutput>;
}

/// Runs commands through the host shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    /// Creates a runner with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            working_dir: None,
        }
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the directory commands run in.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[cfg(not(windows))]
    fn shell_command(command_line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(command_line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(command_line);
        cmd
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> SiResult<CommandOutput> {
        let mut cmd = Self::shell_command(command_line);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        // stdout is not surfaced; leaving it unpiped avoids a full pipe
        // blocking the child.
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let child = cmd.spawn().map_err(SiError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.timeout)?;

        Ok(CommandOutput {
            success: status.success(),
            exit_code: status.code(),
            stderr,
            duration: start.elapsed(),
        })
    }
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> SiResult<(ExitStatus, String)> {
    // A full stderr pipe blocks the child, so drain it while polling.
    let stderr_reader = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    // The reader is detached: a grandchild may still hold the pipe.
                    return Err(SiError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(SiError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    Ok((status, stderr))
}
