use anyhow::Context;
use tmdialog_runtime::{ProcessExecutor, textutil};

use super::{read_stdin, write_stdout};
use crate::error::Result;

pub async fn rtf_to_text() -> Result<()> {
	let input = read_stdin()?;
	let output = textutil::rtf_to_text(&ProcessExecutor::new(), &input)
		.await
		.context("converting RTF to text with textutil")?;
	write_stdout(&output)
}

pub async fn text_to_rtf() -> Result<()> {
	let input = read_stdin()?;
	let output = textutil::text_to_rtf(&ProcessExecutor::new(), &input)
		.await
		.context("converting text to RTF with textutil")?;
	write_stdout(&output)
}
