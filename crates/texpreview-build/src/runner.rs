//! External command execution.
//!
//! All toolchain invocations go through the [`CommandRunner`] trait so the
//! compile pipeline can be exercised in tests without a TeX installation:
//!
//! - **Production**: [`TokioCommandRunner`] spawns the program with
//!   `tokio::process`, bounded by a wall-clock timeout.
//! - **Testing**: any `CommandRunner` implementation that writes fake
//!   artifacts into the working directory and returns scripted outcomes.
//!
//! A failed command is never an opaque error. [`CommandFailure`] always
//! carries whatever stdout/stderr was captured plus the exit code, so callers
//! can build diagnostics from it.

use async_trait::async_trait;
use log::{debug, warn};
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Wall-clock bound applied to every toolchain command unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Exit code a POSIX shell reports for a program it cannot find.
pub const NOT_FOUND_EXIT_CODE: i32 = 127;

/// How long output readers may keep draining after a timed-out child is killed.
///
/// Grandchildren can hold the pipes open after the direct child is gone.
const KILL_GRACE: Duration = Duration::from_millis(250);

/// A program and its argument vector. No shell is involved in running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Renders the command the way it would be typed into a shell.
///
/// An argument containing whitespace is quoted after its first `=` when the
/// `=` comes before the whitespace (`-key="a b"`), and quoted whole otherwise.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            f.write_str(" ")?;
            match arg.find(char::is_whitespace) {
                None => f.write_str(arg)?,
                Some(ws) => match arg[..ws].find('=') {
                    Some(eq) => write!(f, "{}=\"{}\"", &arg[..eq], &arg[eq + 1..])?,
                    None => write!(f, "\"{}\"", arg)?,
                },
            }
        }
        Ok(())
    }
}

/// Captured output of a command that exited with status zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A command that exited non-zero, timed out, or could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// The command line, as rendered by [`CommandSpec`]'s `Display`.
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    pub timed_out: bool,
}

impl CommandFailure {
    /// Builds the failure for a process that ran and exited unsuccessfully.
    pub fn exited(command: &CommandSpec, stdout: String, stderr: String, code: Option<i32>) -> Self {
        Self {
            command: command.to_string(),
            stdout,
            stderr,
            code,
            timed_out: false,
        }
    }

    /// Builds the failure for a process killed at the timeout.
    ///
    /// Output captured before the kill is kept; a notice naming the timeout is
    /// appended to `stderr`.
    pub fn timed_out(command: &CommandSpec, timeout: Duration, stdout: String, stderr: String) -> Self {
        let notice = format!("{}: timed out after {:?}", command.program, timeout);
        let stderr = if stderr.is_empty() {
            notice
        } else if stderr.ends_with('\n') {
            format!("{}{}", stderr, notice)
        } else {
            format!("{}\n{}", stderr, notice)
        };
        Self {
            command: command.to_string(),
            stdout,
            stderr,
            code: None,
            timed_out: true,
        }
    }

    /// Builds the failure for an I/O error around the process.
    ///
    /// A missing executable is reported the way a shell does (`prog: command
    /// not found`, exit code 127), so downstream text matching treats both the
    /// same.
    pub fn io(command: &CommandSpec, err: &io::Error) -> Self {
        let (stderr, code) = if err.kind() == io::ErrorKind::NotFound {
            (
                format!("{}: command not found", command.program),
                Some(NOT_FOUND_EXIT_CODE),
            )
        } else {
            (format!("{}: {}", command.program, err), None)
        };
        Self {
            command: command.to_string(),
            stdout: String::new(),
            stderr,
            code,
            timed_out: false,
        }
    }

    /// The most useful text for a human: stderr, else stdout, else the summary line.
    pub fn detail(&self) -> String {
        if !self.stderr.is_empty() {
            self.stderr.clone()
        } else if !self.stdout.is_empty() {
            self.stdout.clone()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "Command timed out: {}", self.command)
        } else {
            match self.code {
                Some(code) => write!(f, "Command failed with exit code {}: {}", code, self.command),
                None => write!(f, "Command failed: {}", self.command),
            }
        }
    }
}

impl std::error::Error for CommandFailure {}

/// Runs external commands inside a working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync + fmt::Debug {
    /// Runs `command` with `cwd` as its working directory.
    ///
    /// # Returns
    ///
    /// The captured output when the process exits with status zero, otherwise
    /// a [`CommandFailure`] describing what happened.
    async fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<CommandOutput, CommandFailure>;
}

/// Default [`CommandRunner`] backed by `tokio::process`.
///
/// Children are spawned with a null stdin, piped stdout/stderr and
/// `kill_on_drop`, so a timed-out or abandoned compile does not leave the
/// engine running. On Windows no console window is created.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl TokioCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn create_command(program: &str) -> Command {
    #[allow(unused_mut)]
    let mut command = Command::new(program);

    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    command
}

/// Drains one child pipe into a shared buffer so partial output survives a kill.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl Capture {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let task = tokio::spawn(async move {
            let Some(mut pipe) = pipe else {
                return;
            };
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        debug!("stopped reading child output: {}", e);
                        break;
                    }
                }
            }
        });
        Self { buf, task }
    }

    /// Waits up to `grace` for end of stream, then returns whatever was read.
    async fn finish(mut self, grace: Duration) -> String {
        if tokio::time::timeout(grace, &mut self.task).await.is_err() {
            self.task.abort();
        }
        let bytes = std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner));
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<CommandOutput, CommandFailure> {
        debug!("running `{}` in {}", command, cwd.display());

        let mut child = create_command(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CommandFailure::io(command, &e))?;

        let stdout = Capture::spawn(child.stdout.take());
        let stderr = Capture::spawn(child.stderr.take());

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result.map_err(|e| CommandFailure::io(command, &e))?,
            Err(_elapsed) => {
                warn!("`{}` timed out after {:?}", command, self.timeout);
                if let Err(e) = child.kill().await {
                    debug!("failed to kill `{}`: {}", command.program, e);
                }
                let stdout = stdout.finish(KILL_GRACE).await;
                let stderr = stderr.finish(KILL_GRACE).await;
                return Err(CommandFailure::timed_out(command, self.timeout, stdout, stderr));
            }
        };

        let stdout = stdout.finish(self.timeout).await;
        let stderr = stderr.finish(self.timeout).await;

        if status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            debug!("`{}` exited with {}", command.program, status);
            Err(CommandFailure::exited(command, stdout, stderr, status.code()))
        }
    }
}
