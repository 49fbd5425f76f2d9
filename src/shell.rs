// SPDX-License-Identifier: AGPL-3.0-or-later
//! External command execution
//!
//! Every side effect vpsetup has on the host goes through a [`CommandRunner`].
//! [`SystemShell`] spawns real processes with their output streamed straight
//! to the terminal; tests substitute a recording fake.

use std::fmt;
use std::io::{BufRead, Write};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::colors;
use crate::error::{Result, SetupError};

/// Prefix for commands that need administrative rights
pub const ELEVATION: &str = "sudo";

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
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

    /// `program args...` run through [`ELEVATION`]
    pub fn privileged<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut full = vec![program.into()];
        full.extend(args.into_iter().map(Into::into));
        Self::new(ELEVATION, full)
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Something that can run commands on the host
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Whether `name` resolves to an executable on PATH
    async fn is_available(&self, name: &str) -> bool;

    /// Run `command` to completion, failing on a non-zero exit
    async fn execute(&self, command: &CommandLine) -> Result<()>;

    /// Run `command` with `input` fed to its stdin
    async fn execute_with_input(&self, command: &CommandLine, input: &str) -> Result<()>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone)]
pub struct SystemShell {
    /// Print commands instead of running them
    dry_run: bool,
}

impl SystemShell {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn command_failed(command: &CommandLine, reason: impl fmt::Display) -> SetupError {
        SetupError::CommandFailed {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemShell {
    async fn is_available(&self, name: &str) -> bool {
        let lookup = Command::new("which")
            .arg(name)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match lookup {
            Ok(status) => {
                debug!(command = %name, available = status.success(), "Looked up in PATH");
                status.success()
            }
            Err(e) => {
                debug!(command = %name, error = %e, "Could not run which");
                false
            }
        }
    }

    async fn execute(&self, command: &CommandLine) -> Result<()> {
        debug!(command = %command, "Executing command");

        if self.dry_run {
            println!("[DRY RUN] Would execute: {}", command);
            return Ok(());
        }

        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::command_failed(command, e))?;

        if !status.success() {
            warn!(command = %command, %status, "Command exited unsuccessfully");
            return Err(Self::command_failed(command, status));
        }

        Ok(())
    }

    async fn execute_with_input(&self, command: &CommandLine, input: &str) -> Result<()> {
        debug!(command = %command, bytes = input.len(), "Executing command with stdin");

        if self.dry_run {
            println!("[DRY RUN] Would execute: {} <<EOF", command);
            println!("{}", input);
            println!("EOF");
            return Ok(());
        }

        // stdout is discarded: `tee` would otherwise echo the whole file back
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Self::command_failed(command, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                // reap the child so it is not left running or as a zombie
                let _ = child.kill().await;
                return Err(Self::command_failed(command, e));
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Self::command_failed(command, e))?;

        if !status.success() {
            warn!(command = %command, %status, "Command exited unsuccessfully");
            return Err(Self::command_failed(command, status));
        }

        Ok(())
    }
}

/// Prompt on stdout and read one token from stdin
pub fn input(message: &str) -> Result<String> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    prompt(&mut stdin.lock(), &mut stdout.lock(), message)
}

/// Write a colored prompt to `writer` and read the first whitespace-delimited
/// token of the next line from `reader`.
pub fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, message: &str) -> Result<String> {
    write!(writer, "{}{}:{} ", colors::YELLOW, message, colors::RESET).map_err(SetupError::ReadFailed)?;
    writer.flush().map_err(SetupError::ReadFailed)?;

    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(SetupError::ReadFailed)?;
    if read == 0 {
        return Err(SetupError::ReadFailed(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "end of input",
        )));
    }

    match line.split_whitespace().next() {
        Some(token) => Ok(token.trim().to_string()),
        None => Err(SetupError::EmptyInput),
    }
}
