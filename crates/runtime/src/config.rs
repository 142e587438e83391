//! Renderer configuration.
//!
//! TextMate exports the renderer location to bundle commands as `DIALOG` and
//! the bundle's support folder as `TM_BUNDLE_SUPPORT`. Nib dialogs are looked
//! up in `$TM_BUNDLE_SUPPORT/nibs` unless `TMDIALOG_NIB_DIR` points elsewhere.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::locate::find_renderer;

pub const DIALOG_ENV: &str = "DIALOG";
pub const BUNDLE_SUPPORT_ENV: &str = "TM_BUNDLE_SUPPORT";
pub const NIB_DIR_ENV: &str = "TMDIALOG_NIB_DIR";

/// Where the renderer lives and how sessions talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
	/// The `tmdialog` executable.
	pub dialog: PathBuf,
	/// Directory holding `<name>.nib` dialog bundles.
	pub nib_dir: PathBuf,
	/// Upper bound on a single `--wait`. `None` waits indefinitely.
	pub wait_timeout: Option<Duration>,
	/// Escape quotes and backslashes in model values.
	pub escape_model: bool,
}

impl RendererConfig {
	pub fn new(dialog: impl Into<PathBuf>, nib_dir: impl Into<PathBuf>) -> Self {
		Self {
			dialog: dialog.into(),
			nib_dir: nib_dir.into(),
			wait_timeout: None,
			escape_model: false,
		}
	}

	/// Reads the configuration from the process environment.
	///
	/// # Errors
	///
	/// Returns [`Error::RendererNotFound`] if no renderer can be located (see
	/// [`find_renderer`]), and [`Error::NibDirUnset`] if no nib directory can
	/// be derived.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Like [`RendererConfig::from_env`], reading variables through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let dialog = find_renderer(&lookup)?;
		let nib_dir = nib_dir_from(&lookup)?;
		Ok(Self::new(dialog, nib_dir))
	}

	pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
		self.wait_timeout = Some(timeout);
		self
	}

	pub fn with_escaped_model(mut self, escape: bool) -> Self {
		self.escape_model = escape;
		self
	}

	/// Path of the nib bundle for `dialog`.
	///
	/// Only the final path component is used and a trailing `.nib` is
	/// dropped, so `"prefs"`, `"prefs.nib"` and `"../x/prefs.nib"` all name
	/// `<nib_dir>/prefs.nib`.
	pub fn nib_path(&self, dialog: &str) -> PathBuf {
		let name = Path::new(dialog)
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();
		let stem = name.strip_suffix(".nib").unwrap_or(&name);
		self.nib_dir.join(format!("{stem}.nib"))
	}
}

/// Nib directory named by `TMDIALOG_NIB_DIR`, else `$TM_BUNDLE_SUPPORT/nibs`.
///
/// # Errors
///
/// Returns [`Error::NibDirUnset`] if neither variable is set.
pub fn nib_dir_from<F>(lookup: F) -> Result<PathBuf>
where
	F: Fn(&str) -> Option<String>,
{
	let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

	match non_empty(NIB_DIR_ENV) {
		Some(dir) => Ok(PathBuf::from(dir)),
		None => non_empty(BUNDLE_SUPPORT_ENV)
			.map(|support| PathBuf::from(support).join("nibs"))
			.ok_or(Error::NibDirUnset),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn nib_dir_defaults_to_bundle_support() {
		let config = RendererConfig::from_lookup(lookup(&[
			(DIALOG_ENV, "/opt/tm/tm_dialog2"),
			(BUNDLE_SUPPORT_ENV, "/bundles/Foo.tmbundle/Support"),
		]))
		.unwrap();
		assert_eq!(config.dialog, PathBuf::from("/opt/tm/tm_dialog2"));
		assert_eq!(
			config.nib_dir,
			PathBuf::from("/bundles/Foo.tmbundle/Support/nibs")
		);
		assert_eq!(config.wait_timeout, None);
		assert!(!config.escape_model);
	}

	#[test]
	fn explicit_nib_dir_wins() {
		let config = RendererConfig::from_lookup(lookup(&[
			(DIALOG_ENV, "tm_dialog2"),
			(BUNDLE_SUPPORT_ENV, "/support"),
			(NIB_DIR_ENV, "/custom/nibs"),
		]))
		.unwrap();
		assert_eq!(config.nib_dir, PathBuf::from("/custom/nibs"));
	}

	#[test]
	fn missing_dialog_is_an_error() {
		let err = RendererConfig::from_lookup(lookup(&[(BUNDLE_SUPPORT_ENV, "/support")]))
			.unwrap_err();
		assert!(matches!(err, Error::RendererNotFound));

		let err = RendererConfig::from_lookup(lookup(&[(DIALOG_ENV, "  ")])).unwrap_err();
		assert!(matches!(err, Error::RendererNotFound));
	}

	#[test]
	fn missing_nib_dir_is_an_error() {
		let err = RendererConfig::from_lookup(lookup(&[(DIALOG_ENV, "tm_dialog2")])).unwrap_err();
		assert!(matches!(err, Error::NibDirUnset));
	}

	#[test]
	fn nib_dir_resolves_without_a_renderer() {
		let dir = nib_dir_from(lookup(&[(NIB_DIR_ENV, "/only/nibs")])).unwrap();
		assert_eq!(dir, PathBuf::from("/only/nibs"));
	}

	#[test]
	fn nib_path_uses_basename_without_extension() {
		let config = RendererConfig::new("tm_dialog2", "/nibs");
		assert_eq!(config.nib_path("prefs"), PathBuf::from("/nibs/prefs.nib"));
		assert_eq!(config.nib_path("prefs.nib"), PathBuf::from("/nibs/prefs.nib"));
		assert_eq!(config.nib_path("../elsewhere/prefs.nib/"), PathBuf::from("/nibs/prefs.nib"));
	}

	#[test]
	fn builders_set_options() {
		let config = RendererConfig::new("d", "/n")
			.with_wait_timeout(Duration::from_secs(3))
			.with_escaped_model(true);
		assert_eq!(config.wait_timeout, Some(Duration::from_secs(3)));
		assert!(config.escape_model);
	}
}
