//! Test doubles for the renderer.
//!
//! [`ScriptedExecutor`] replays queued renderer replies in order and records
//! every command it receives, so session behavior can be checked without a
//! `tmdialog` binary.
//!
//! ```ignore
//! let executor = Arc::new(ScriptedExecutor::new());
//! executor.push_output("17");
//! executor.push_output(event_document(CLOSE_WINDOW, None));
//! let mut session = DialogSession::new(config, executor.clone());
//! ```

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::executor::{CommandLine, ShellExecutor};

/// One queued reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
	Output(Vec<u8>),
	Fail(String),
	/// Never completes; exercises timeouts and cancellation.
	Hang,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
	pub command: CommandLine,
	pub input: Option<Vec<u8>>,
	pub capture_stderr: bool,
}

/// [`ShellExecutor`] that answers from a queue.
///
/// Once the queue is drained every call returns empty output, which the
/// session reads as the renderer ending the dialog.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
	replies: Mutex<VecDeque<ScriptedReply>>,
	calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_output(&self, output: impl Into<Vec<u8>>) {
		self.replies.lock().push_back(ScriptedReply::Output(output.into()));
	}

	pub fn push_failure(&self, reason: impl Into<String>) {
		self.replies.lock().push_back(ScriptedReply::Fail(reason.into()));
	}

	pub fn push_hang(&self) {
		self.replies.lock().push_back(ScriptedReply::Hang);
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}

	/// Arguments of every recorded call, for compact assertions.
	pub fn call_args(&self) -> Vec<Vec<String>> {
		self.calls
			.lock()
			.iter()
			.map(|call| call.command.args.clone())
			.collect()
	}

	pub fn remaining(&self) -> usize {
		self.replies.lock().len()
	}
}

#[async_trait]
impl ShellExecutor for ScriptedExecutor {
	async fn execute(
		&self,
		command: &CommandLine,
		input: Option<&[u8]>,
		capture_stderr: bool,
	) -> Result<Vec<u8>> {
		self.calls.lock().push(RecordedCall {
			command: command.clone(),
			input: input.map(<[u8]>::to_vec),
			capture_stderr,
		});

		let reply = self.replies.lock().pop_front();
		match reply {
			Some(ScriptedReply::Output(bytes)) => Ok(bytes),
			Some(ScriptedReply::Fail(reason)) => Err(Error::LaunchFailed {
				program: command.program.display().to_string(),
				reason,
			}),
			Some(ScriptedReply::Hang) => std::future::pending().await,
			None => Ok(Vec::new()),
		}
	}
}

/// Wraps a plist body in the document envelope the renderer emits.
pub fn plist_document(body: &str) -> String {
	format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
		 <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
		 \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
		 <plist version=\"1.0\">\n{body}\n</plist>\n"
	)
}

/// A wait reply naming `action`, with an optional model dict body.
pub fn event_document(action: &str, model: Option<&str>) -> String {
	let model = model
		.map(|body| format!("<key>model</key>\n<dict>{body}</dict>"))
		.unwrap_or_default();
	plist_document(&format!(
		"<dict>\n\
		 <key>eventInfo</key>\n\
		 <dict><key>type</key><string>{action}</string></dict>\n\
		 {model}\n\
		 </dict>"
	))
}
