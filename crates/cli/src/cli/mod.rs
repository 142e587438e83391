
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tmdialog_protocol::MAX_DEPTH_CEILING;

use crate::styles::help_styles;

/// Root CLI for tmdialog.
#[derive(Parser, Debug)]
#[command(name = "tmdialog")]
#[command(about = "Drive TextMate nib dialogs and decode their plist output")]
#[command(version)]
#[command(styles = help_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Decode a plist document and print it as JSON.
	Decode(DecodeArgs),
	/// Render KEY=VALUE pairs as a dialog model string.
	Model(ModelArgs),
	/// Load a nib dialog, run its event loop, then dispose it.
	Show(ShowArgs),
	/// Convert RTF on stdin to plain text on stdout.
	Rtf2txt,
	/// Convert plain text on stdin to RTF on stdout.
	Txt2rtf,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
	/// Plist file to decode (stdin when omitted).
	#[arg(value_name = "FILE")]
	pub file: Option<PathBuf>,

	/// Print single-line JSON.
	#[arg(long)]
	pub compact: bool,

	/// Maximum container nesting depth (1 to 1024).
	#[arg(long, value_name = "N", value_parser = parse_max_depth)]
	pub max_depth: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
	/// Model entries, in order.
	#[arg(value_name = "KEY=VALUE", value_parser = parse_key_val)]
	pub params: Vec<(String, String)>,

	/// Escape quotes and backslashes in values.
	#[arg(long)]
	pub escape: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
	/// Dialog name, resolved to `<nib-dir>/<name>.nib`.
	#[arg(value_name = "DIALOG")]
	pub dialog: String,

	/// Initial model entry (repeatable).
	#[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
	pub params: Vec<(String, String)>,

	/// Print the event as a JSON line and keep waiting (repeatable).
	#[arg(long, value_name = "ACTION")]
	pub on: Vec<String>,

	/// Stop the loop when this action fires (repeatable).
	#[arg(long, value_name = "ACTION")]
	pub close_on: Vec<String>,

	/// Give up on a single wait after this many seconds.
	#[arg(long, value_name = "SECS")]
	pub timeout: Option<u64>,

	/// Renderer binary (overrides DIALOG and discovery).
	#[arg(long, value_name = "PATH")]
	pub renderer: Option<PathBuf>,

	/// Directory holding `.nib` bundles.
	#[arg(long, value_name = "DIR")]
	pub nib_dir: Option<PathBuf>,

	/// Escape quotes and backslashes in model values.
	#[arg(long)]
	pub escape: bool,
}

/// Splits `KEY=VALUE` at the first `=`. The value may be empty.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got '{raw}'")),
	}
}

/// Accepts a nesting limit between 1 and [`MAX_DEPTH_CEILING`].
pub fn parse_max_depth(raw: &str) -> Result<usize, String> {
	let depth: usize = raw
		.parse()
		.map_err(|_| format!("expected a number, got '{raw}'"))?;
	if depth == 0 || depth > MAX_DEPTH_CEILING {
		return Err(format!("must be between 1 and {MAX_DEPTH_CEILING}"));
	}
	Ok(depth)
}
