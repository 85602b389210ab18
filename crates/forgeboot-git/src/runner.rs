//! External process execution.
//!
//! Commands are always described as a program plus an argument vector and
//! spawned directly with [`tokio::process::Command`]; nothing goes through
//! a shell, so values containing quotes or spaces reach the program intact.

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use forgeboot_core::{Error, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// A single invocation of an external program.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Written to the child's stdin, which is then closed
    pub stdin: Option<String>,
}

impl CommandSpec {
    /// Describe `program` invoked with `args`.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    /// Feed `input` to the program on stdin.
    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// stdin carries tokens; keep it out of debug output.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a process that exited with code 0.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a process that exited with `code`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::Command`].
    pub fn check(self, spec: &CommandSpec) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(self.into_error(spec))
    }

    /// Build the [`Error::Command`] describing this exit.
    pub fn into_error(self, spec: &CommandSpec) -> Error {
        let status = match self.code {
            Some(code) => format!("exit code {}", code),
            None => "signal".to_string(),
        };
        Error::Command {
            program: spec.to_string(),
            status,
            stderr: self.stderr.trim().to_string(),
        }
    }
}

/// Runs external programs.
///
/// A non-zero exit is not an error at this level; callers decide what an
/// exit code means through [`CommandOutput`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion and capture its output.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    envs: Vec<(String, String)>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an extra environment variable on every spawned process.
    ///
    /// Setting `GIT_CONFIG_GLOBAL` this way points `git config --global`
    /// at another file.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        for (k, v) in &self.envs {
            cmd.env(k, v);
        }

        cmd.stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(command = %spec, "Spawning command");

        let mut child = cmd.spawn().map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to spawn {}: {}", spec.program, e),
            ))
        })?;

        let mut write_error = None;
        if let (Some(input), Some(mut stdin)) = (&spec.stdin, child.stdin.take()) {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                debug!(command = %spec, error = %e, "Failed to write stdin");
                write_error = Some(e);
            }
            drop(stdin);
        }

        // Always reap the child; a failed write surfaces only if it exited cleanly.
        let output = child.wait_with_output().await?;
        if let Some(e) = write_error {
            if output.status.success() {
                return Err(Error::Io(e));
            }
        }

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %spec, code = ?result.code, "Command finished");
        Ok(result)
    }
}
