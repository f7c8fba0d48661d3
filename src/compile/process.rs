use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::foundation::error::{ScssError, ScssResult};
use crate::foundation::platform::OsFamily;

/// Everything captured from one finished child process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// `true` for a zero exit code.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Seam between the compile filter and the operating system.
///
/// `stdin` of `None` means the child gets a null standard input.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` to completion and capture its output.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> ScssResult<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Clone, Debug, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Runner that waits for the child without a bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and fail with [`ScssError::ProcessTimeout`] once `timeout` elapses.
    ///
    /// A zero duration means no bound.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Configured wait bound, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn wait(&self, program: &Path, child: &mut Child) -> ScssResult<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return Ok(child
                .wait()
                .with_context(|| format!("failed to wait for '{}'", program.display()))?);
        };

        let started = Instant::now();
        loop {
            let polled = child
                .try_wait()
                .with_context(|| format!("failed to poll '{}'", program.display()))?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                // The child may exit between the poll and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ScssError::ProcessTimeout {
                    program: program.to_path_buf(),
                    timeout,
                });
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> ScssResult<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ScssError::ProcessLaunch {
            program: program.to_path_buf(),
            source,
        })?;

        let stdout_drain = drain(child.stdout.take(), "stdout")?;
        let stderr_drain = drain(child.stderr.take(), "stderr")?;

        let feeder = match stdin {
            Some(input) => {
                let pipe = child
                    .stdin
                    .take()
                    .ok_or_else(|| anyhow::anyhow!("failed to open child stdin (unexpected)"))?;
                Some(feed(pipe, input.to_vec()))
            }
            None => None,
        };

        // A killed child may leave a grandchild holding stdin open, so the feeder is only
        // joined once the child exited on its own.
        let status = self.wait(program, &mut child)?;
        if let Some(feeder) = feeder {
            feeder
                .join()
                .map_err(|_| anyhow::anyhow!("child stdin writer thread panicked"))?
                .with_context(|| format!("failed to write stdin of '{}'", program.display()))?;
        }
        let stdout = join_drain(stdout_drain, "stdout")?;
        let stderr = join_drain(stderr_drain, "stderr")?;

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn feed(mut pipe: ChildStdin, input: Vec<u8>) -> JoinHandle<std::io::Result<()>> {
    std::thread::spawn(move || match pipe.write_all(&input) {
        // The child stopped reading; its exit status tells the rest.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

fn drain<R>(pipe: Option<R>, name: &str) -> ScssResult<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    let mut pipe = pipe.ok_or_else(|| anyhow::anyhow!("failed to open child {name} (unexpected)"))?;
    Ok(std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    }))
}

fn join_drain(handle: JoinHandle<std::io::Result<Vec<u8>>>, name: &str) -> ScssResult<Vec<u8>> {
    let bytes = handle
        .join()
        .map_err(|_| anyhow::anyhow!("child {name} drain thread panicked"))?
        .with_context(|| format!("child {name} read failed"))?;
    Ok(bytes)
}

/// Quote one argument for the shell of `family`.
///
/// POSIX shells get single quotes with embedded quotes spliced out; Windows gets double quotes
/// with `%`, `!` and `"` replaced by spaces, the same treatment `cmd.exe` wrappers apply.
pub fn shell_escape(arg: &OsStr, family: OsFamily) -> String {
    let arg = arg.to_string_lossy();
    match family {
        OsFamily::Windows => {
            let cleaned: String = arg
                .chars()
                .map(|c| if matches!(c, '%' | '!' | '"') { ' ' } else { c })
                .collect();
            format!("\"{cleaned}\"")
        }
        OsFamily::Darwin | OsFamily::Unix => format!("'{}'", arg.replace('\'', "'\\''")),
    }
}

/// Render `program` plus `args` as a single shell-escaped command string.
pub fn render_command_line(program: &Path, args: &[OsString], family: OsFamily) -> String {
    std::iter::once(shell_escape(program.as_os_str(), family))
        .chain(args.iter().map(|a| shell_escape(a, family)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/compile/process.rs"]
mod tests;
