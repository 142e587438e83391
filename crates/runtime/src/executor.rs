//! External command execution.
//!
//! Every renderer interaction is one short-lived process: arguments go in as
//! argv (never through a shell), optional bytes go to stdin, and stdout comes
//! back. [`ShellExecutor`] is the seam the session talks to, so tests can
//! substitute a scripted executor for real processes.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
	pub program: PathBuf,
	pub args: Vec<String>,
}

impl CommandLine {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			args: Vec::new(),
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
}

/// Shell-quoted rendering, for logs.
impl fmt::Display for CommandLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let program = self.program.to_string_lossy();
		let words = std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str));
		f.write_str(&shell_words::join(words))
	}
}

/// Runs external commands on behalf of a dialog session.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
	/// Runs `command`, feeding `input` on stdin, and returns its stdout.
	///
	/// With `capture_stderr`, the output is stdout, a newline, then stderr.
	/// A non-zero exit status is not an error; callers judge the output.
	async fn execute(
		&self,
		command: &CommandLine,
		input: Option<&[u8]>,
		capture_stderr: bool,
	) -> Result<Vec<u8>>;
}

/// [`ShellExecutor`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl ShellExecutor for ProcessExecutor {
	async fn execute(
		&self,
		command: &CommandLine,
		input: Option<&[u8]>,
		capture_stderr: bool,
	) -> Result<Vec<u8>> {
		let mut cmd = Command::new(&command.program);
		cmd.args(&command.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(if capture_stderr {
				Stdio::piped()
			} else {
				Stdio::null()
			})
			.kill_on_drop(true);

		let mut child = cmd.spawn().map_err(|e| Error::LaunchFailed {
			program: command.program.display().to_string(),
			reason: e.to_string(),
		})?;

		let stdin = child.stdin.take();
		let feed = async move {
			if let (Some(mut stdin), Some(input)) = (stdin, input) {
				stdin.write_all(input).await?;
				stdin.shutdown().await?;
			}
			Ok::<_, std::io::Error>(())
		};

		let (fed, output) = tokio::join!(feed, child.wait_with_output());
		let output = output?;
		if let Err(e) = fed {
			// The child may exit without draining stdin; its output still counts.
			debug!(target = "tmdialog", command = %command, error = %e, "stdin write failed");
		}

		debug!(
			target = "tmdialog",
			command = %command,
			status = %output.status,
			bytes = output.stdout.len(),
			"command finished"
		);

		let mut out = output.stdout;
		if capture_stderr {
			out.push(b'\n');
			out.extend_from_slice(&output.stderr);
		}
		Ok(out)
	}
}
