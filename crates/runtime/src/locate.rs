//! Renderer discovery.
//!
//! Handles locating the `tmdialog` executable when `DIALOG` is not exported,
//! e.g. when a bundle command is run from a terminal instead of TextMate.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub const SUPPORT_PATH_ENV: &str = "TM_SUPPORT_PATH";

/// Executable names TextMate has shipped the renderer under.
const RENDERER_NAMES: [&str; 2] = ["tm_dialog2", "tm_dialog"];

/// Get the path to the renderer executable
///
/// Candidates, in order:
/// 1. `DIALOG` environment variable (set by TextMate for bundle commands)
/// 2. `$TM_SUPPORT_PATH/bin/tm_dialog2` or `tm_dialog`
/// 3. `tm_dialog2` or `tm_dialog` on `PATH`
///
/// `DIALOG` is trusted as given; the other candidates must exist.
///
/// # Errors
///
/// Returns `Error::RendererNotFound` if no candidate is found.
pub fn find_renderer<F>(lookup: F) -> Result<PathBuf>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(dialog) = lookup(crate::config::DIALOG_ENV).filter(|v| !v.trim().is_empty()) {
		return Ok(PathBuf::from(dialog));
	}

	if let Some(support) = lookup(SUPPORT_PATH_ENV) {
		if let Some(path) = find_in_dir(&Path::new(&support).join("bin")) {
			debug!(target = "tmdialog", path = %path.display(), "renderer found in TM_SUPPORT_PATH");
			return Ok(path);
		}
	}

	if let Some(path) = find_on_path() {
		debug!(target = "tmdialog", path = %path.display(), "renderer found on PATH");
		return Ok(path);
	}

	Err(Error::RendererNotFound)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
	RENDERER_NAMES
		.iter()
		.map(|name| dir.join(name))
		.find(|candidate| candidate.is_file())
}

fn find_on_path() -> Option<PathBuf> {
	RENDERER_NAMES.iter().find_map(|name| which::which(name).ok())
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::TempDir;

	use super::*;

	#[test]
	fn dialog_env_wins() {
		let path = find_renderer(|key| match key {
			"DIALOG" => Some("/Applications/TextMate.app/tm_dialog2".to_string()),
			_ => None,
		})
		.unwrap();
		assert_eq!(path, PathBuf::from("/Applications/TextMate.app/tm_dialog2"));
	}

	#[test]
	fn support_path_bin_is_searched() {
		let temp = TempDir::new().unwrap();
		let bin = temp.path().join("bin");
		fs::create_dir(&bin).unwrap();
		fs::write(bin.join("tm_dialog"), "").unwrap();

		let support = temp.path().to_string_lossy().into_owned();
		let path = find_renderer(|key| (key == SUPPORT_PATH_ENV).then(|| support.clone())).unwrap();
		assert_eq!(path, bin.join("tm_dialog"));
	}

	#[test]
	fn newer_renderer_name_is_preferred() {
		let temp = TempDir::new().unwrap();
		fs::write(temp.path().join("tm_dialog"), "").unwrap();
		fs::write(temp.path().join("tm_dialog2"), "").unwrap();

		assert_eq!(find_in_dir(temp.path()), Some(temp.path().join("tm_dialog2")));
	}

	#[test]
	fn empty_support_dir_finds_nothing() {
		let temp = TempDir::new().unwrap();
		assert_eq!(find_in_dir(temp.path()), None);
	}
}
