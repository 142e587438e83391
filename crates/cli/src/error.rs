use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("dialog '{name}' could not be loaded from {}", nib_dir.display())]
	DialogNotLoaded { name: String, nib_dir: PathBuf },

	#[error(transparent)]
	Protocol(#[from] tmdialog_protocol::Error),

	#[error(transparent)]
	Runtime(#[from] tmdialog_runtime::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}
