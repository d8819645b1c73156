//! Subprocess execution
//!
//! All external commands go through [`CommandRunner::run`]. The caller picks
//! an [`OutputMode`]: stream the child's stdout to the console, or capture it
//! for parsing. In both modes stderr is inherited so build-tool progress stays
//! visible, and the child is always reaped before returning.

use std::fmt;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{DevError, ExecutionFailure};

/// How a child's standard output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit stdout; nothing is captured
    Stream,
    /// Pipe stdout back to the caller
    Capture,
}

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a successful subprocess execution
#[derive(Debug, Default)]
pub struct CommandResult {
    /// Captured standard output (empty in [`OutputMode::Stream`])
    pub stdout: Vec<u8>,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Captured stdout as text with surrounding whitespace removed
    ///
    /// Fails rather than substituting replacement characters, since the text
    /// is usually a path.
    pub fn stdout_trimmed(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.stdout).map(str::trim)
    }
}

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run `invocation`, failing on launch errors and non-zero exits
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandResult, DevError>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandResult, DevError> {
        run_command(invocation, mode)
    }
}

/// Child handle that is killed and reaped if dropped before `wait` succeeds
struct ReapedChild {
    child: Child,
    reaped: bool,
}

impl ReapedChild {
    fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ReapedChild {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run a command in the given output mode
pub fn run_command(invocation: &Invocation, mode: OutputMode) -> Result<CommandResult, DevError> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.stdin(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    cmd.stdout(match mode {
        OutputMode::Stream => Stdio::inherit(),
        OutputMode::Capture => Stdio::piped(),
    });

    info!("executing: {}", invocation);

    let child = cmd
        .spawn()
        .map_err(|e| DevError::execution(invocation, ExecutionFailure::Spawn(e)))?;
    let mut child = ReapedChild {
        child,
        reaped: false,
    };

    let mut stdout = Vec::new();
    if let Some(mut pipe) = child.child.stdout.take() {
        pipe.read_to_end(&mut stdout)
            .map_err(|e| DevError::execution(invocation, ExecutionFailure::Wait(e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| DevError::execution(invocation, ExecutionFailure::Wait(e)))?;

    let result = CommandResult {
        stdout,
        duration: start.elapsed(),
    };
    debug!(duration = ?result.duration, captured = result.stdout.len(), "finished: {}", invocation);

    if !status.success() {
        return Err(DevError::exit_status(invocation, status));
    }

    Ok(result)
}
