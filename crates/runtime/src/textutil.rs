//! RTF conversion through macOS `textutil`.
//!
//! Dialog text views hand back RTF. These helpers pipe it through
//! `textutil -stdin -stdout` using the same executor the session uses.

use crate::error::Result;
use crate::executor::{CommandLine, ShellExecutor};

const TEXTUTIL: &str = "textutil";

fn convert(to: &str, from: &str) -> CommandLine {
	CommandLine::new(TEXTUTIL).args(["-convert", to, "-format", from, "-stdin", "-stdout"])
}

/// Converts RTF to plain text.
pub async fn rtf_to_text(executor: &dyn ShellExecutor, rtf: &[u8]) -> Result<Vec<u8>> {
	executor.execute(&convert("txt", "rtf"), Some(rtf), false).await
}

/// Converts plain text to RTF.
pub async fn text_to_rtf(executor: &dyn ShellExecutor, text: &[u8]) -> Result<Vec<u8>> {
	executor.execute(&convert("rtf", "txt"), Some(text), false).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::ScriptedExecutor;

	#[tokio::test]
	async fn rtf_to_text_pipes_input() {
		let executor = ScriptedExecutor::new();
		executor.push_output("plain");

		let out = rtf_to_text(&executor, b"{\\rtf1 plain}").await.unwrap();
		assert_eq!(out, b"plain");

		let calls = executor.calls();
		assert_eq!(calls[0].command.program.to_str(), Some("textutil"));
		assert_eq!(
			calls[0].command.args,
			vec!["-convert", "txt", "-format", "rtf", "-stdin", "-stdout"]
		);
		assert_eq!(calls[0].input.as_deref(), Some(b"{\\rtf1 plain}".as_slice()));
	}

	#[tokio::test]
	async fn text_to_rtf_swaps_formats() {
		let executor = ScriptedExecutor::new();
		text_to_rtf(&executor, b"hi").await.unwrap();
		assert_eq!(
			executor.call_args()[0],
			vec!["-convert", "rtf", "-format", "txt", "-stdin", "-stdout"]
		);
	}
}
