//! Error types for the dialog runtime.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the renderer.
#[derive(Debug, Error)]
pub enum Error {
	/// The `DIALOG` renderer binary is not configured or does not exist.
	#[error("tmdialog renderer not found. Set DIALOG to the tmdialog executable")]
	RendererNotFound,

	/// Neither `TMDIALOG_NIB_DIR` nor `TM_BUNDLE_SUPPORT` is set.
	#[error("nib directory not configured. Set TMDIALOG_NIB_DIR or TM_BUNDLE_SUPPORT")]
	NibDirUnset,

	/// Failed to start an external command.
	#[error("Failed to launch {program}: {reason}")]
	LaunchFailed { program: String, reason: String },

	/// The session has no renderer token.
	#[error("Dialog is not loaded")]
	NotLoaded,

	/// The renderer did not answer a wait in time.
	#[error("Timeout after {0:?} waiting for the renderer")]
	Timeout(Duration),

	/// Renderer output could not be decoded.
	#[error(transparent)]
	Protocol(#[from] tmdialog_protocol::Error),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout(_))
	}
}
