//! `tmdialog nib` command lines.

use std::path::{Path, PathBuf};

use crate::executor::CommandLine;
use crate::session::SessionToken;

/// A request to the renderer's `nib` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCommand {
	/// Open the nib at `nib` with an initial model; prints the new token.
	Load { nib: PathBuf, model: String },
	/// Replace the model of a running dialog.
	Update { token: SessionToken, model: String },
	/// Close the dialog and release the token.
	Dispose { token: SessionToken },
	/// Block until the dialog reports an event; prints it as a plist.
	Wait { token: SessionToken },
}

impl RendererCommand {
	pub fn name(&self) -> &'static str {
		match self {
			RendererCommand::Load { .. } => "load",
			RendererCommand::Update { .. } => "update",
			RendererCommand::Dispose { .. } => "dispose",
			RendererCommand::Wait { .. } => "wait",
		}
	}

	pub fn to_command_line(&self, dialog: &Path) -> CommandLine {
		let base = CommandLine::new(dialog).arg("nib");
		match self {
			RendererCommand::Load { nib, model } => base
				.arg("--load")
				.arg(nib.to_string_lossy())
				.arg("--model")
				.arg(model.as_str()),
			RendererCommand::Update { token, model } => base
				.arg("--update")
				.arg(token.to_string())
				.arg("--model")
				.arg(model.as_str()),
			RendererCommand::Dispose { token } => base.arg("--dispose").arg(token.to_string()),
			RendererCommand::Wait { token } => base.arg("--wait").arg(token.to_string()),
		}
	}
}
