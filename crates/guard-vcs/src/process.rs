//! External command execution
//!
//! Two call shapes are offered. [`run_checked`] turns any failure into an
//! [`Error`]; [`run_report`] never fails and hands back a [`RunReport`] so
//! the caller can decide whether a non-zero exit is the expected result.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// A command line to run, built up before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl VcsCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the process from `dir` instead of the caller's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for VcsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a run ended
#[derive(Debug)]
pub enum RunStatus {
    /// Exited with status zero
    Success,
    /// Exited non-zero; `None` when terminated by a signal
    Exited(Option<i32>),
    /// The process could not be started
    SpawnFailed(std::io::Error),
}

/// Outcome of a finished command, with its captured output
#[derive(Debug)]
pub struct RunReport {
    /// Rendered command line
    pub command: String,
    pub status: RunStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RunStatus::Success)
    }

    /// The failure of this run, or `None` if it succeeded.
    pub fn error(&self) -> Option<Error> {
        match &self.status {
            RunStatus::Success => None,
            RunStatus::Exited(code) => Some(Error::CommandFailed {
                command: self.command.clone(),
                code: *code,
                stderr: self.stderr.trim().to_string(),
            }),
            RunStatus::SpawnFailed(source) => Some(Error::Spawn {
                command: self.command.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            }),
        }
    }

    /// Convert into `Err` when the run failed.
    pub fn into_result(self) -> Result<Self> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Combined stdout and stderr, for matching on messages.
    pub fn output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Run `command` and report how it ended without treating failure as an error.
pub async fn run_report(command: &VcsCommand) -> RunReport {
    let rendered = command.to_string();
    debug!(command = %rendered, "running command");

    match command.to_command().output().await {
        Ok(output) => {
            let status = if output.status.success() {
                RunStatus::Success
            } else {
                RunStatus::Exited(output.status.code())
            };
            debug!(command = %rendered, code = ?output.status.code(), "command finished");
            RunReport {
                command: rendered,
                status,
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
        }
        Err(e) => {
            debug!(command = %rendered, error = %e, "command could not start");
            RunReport {
                command: rendered,
                status: RunStatus::SpawnFailed(e),
                stdout: String::new(),
                stderr: String::new(),
            }
        }
    }
}

/// Run `command`, failing unless it starts and exits with status zero.
pub async fn run_checked(command: &VcsCommand) -> Result<()> {
    run_report(command).await.into_result().map(|_| ())
}

/// Check whether `program` can be started (`<program> --version` succeeds).
pub async fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Environment variable that turns a missing VCS tool into a test failure
/// instead of a skip. Set it on CI machines that must run every backend.
pub const REQUIRE_TOOLS_ENV: &str = "GUARD_REQUIRE_TOOLS";

/// Whether [`REQUIRE_TOOLS_ENV`] is set to a truthy value.
pub fn tools_required() -> bool {
    flag_enabled(std::env::var(REQUIRE_TOOLS_ENV).ok().as_deref())
}

fn flag_enabled(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
        None => false,
    }
}

/// Gate for tests that drive `program`: `true` when it is installed.
///
/// A missing tool panics when [`tools_required`], otherwise the skip is
/// reported on stderr and `false` is returned.
pub async fn require_tool(program: &str) -> bool {
    if tool_available(program).await {
        return true;
    }
    if tools_required() {
        panic!("`{program}` is not installed and {REQUIRE_TOOLS_ENV} is set");
    }
    eprintln!("SKIPPED: `{program}` is not installed (set {REQUIRE_TOOLS_ENV}=1 to fail instead)");
    false
}
