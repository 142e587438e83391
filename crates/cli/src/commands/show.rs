use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tmdialog_runtime::config::nib_dir_from;
use tmdialog_runtime::{
	ACTION_CONTINUE, Action, ActionContext, DialogSession, ModelParams, ProcessExecutor,
	RendererConfig, RunSummary, ShellExecutor, StopReason, find_renderer,
};
use tracing::{debug, info};

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};

pub async fn execute(args: ShowArgs) -> Result<()> {
	let config = resolve_config(&args, |key| std::env::var(key).ok())?;
	let executor: Arc<dyn ShellExecutor> = Arc::new(ProcessExecutor::new());

	let mut session = build_session(&args, config, executor);
	let cancel = session.cancellation_token();
	let ctrl_c = tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			debug!(target = "tmdialog", "interrupt received");
			cancel.cancel();
		}
	});

	let result = show(&args, &mut session).await;
	ctrl_c.abort();

	let summary = result?;
	eprintln!("{} {}", "stopped:".dimmed(), describe(&summary.stop));
	Ok(())
}

/// Renderer and nib directory from flags, falling back to the environment.
fn resolve_config<F>(args: &ShowArgs, lookup: F) -> Result<RendererConfig>
where
	F: Fn(&str) -> Option<String>,
{
	let dialog = match &args.renderer {
		Some(path) => path.clone(),
		None => find_renderer(&lookup)?,
	};
	let nib_dir = match &args.nib_dir {
		Some(dir) => dir.clone(),
		None => nib_dir_from(&lookup)?,
	};

	let mut config = RendererConfig::new(dialog, nib_dir).with_escaped_model(args.escape);
	if let Some(secs) = args.timeout {
		config = config.with_wait_timeout(Duration::from_secs(secs));
	}
	Ok(config)
}

fn build_session(
	args: &ShowArgs,
	config: RendererConfig,
	executor: Arc<dyn ShellExecutor>,
) -> DialogSession {
	let mut session = DialogSession::new(config, executor);
	for name in &args.on {
		session.register_action(name.clone(), |ctx| {
			println!("{}", event_line(ctx));
			ACTION_CONTINUE
		});
	}
	for name in &args.close_on {
		session.register(name.clone(), Action::Close);
	}
	session
}

async fn show(args: &ShowArgs, session: &mut DialogSession) -> Result<RunSummary> {
	let params: ModelParams = args.params.iter().cloned().collect();
	if !session.load(&args.dialog, &params).await {
		return Err(CliError::DialogNotLoaded {
			name: args.dialog.clone(),
			nib_dir: session.config().nib_dir.clone(),
		});
	}

	let result = session.run().await;
	session.dispose().await;

	let summary = result?;
	info!(
		target = "tmdialog",
		iterations = summary.iterations,
		dispatched = summary.dispatched,
		"dialog closed"
	);
	Ok(summary)
}

/// One JSON object per reported event.
fn event_line(ctx: &ActionContext<'_>) -> String {
	serde_json::json!({
		"action": ctx.action(),
		"model": ctx.model(),
	})
	.to_string()
}

fn describe(stop: &StopReason) -> String {
	match stop {
		StopReason::Action { action, status } => format!("action '{action}' returned {status}"),
		StopReason::EmptyResponse => "renderer ended the dialog".to_string(),
		StopReason::Cancelled => "interrupted".to_string(),
		StopReason::TimedOut => "timed out waiting for an event".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use tempfile::TempDir;
	use tmdialog_runtime::testing::{ScriptedExecutor, event_document};
	use tmdialog_runtime::{PlistValue, SessionState};

	use super::*;

	fn args(dialog: &str) -> ShowArgs {
		ShowArgs {
			dialog: dialog.to_string(),
			params: vec![("title".to_string(), "Hi".to_string())],
			on: Vec::new(),
			close_on: Vec::new(),
			timeout: None,
			renderer: None,
			nib_dir: None,
			escape: false,
		}
	}

	fn nibs() -> TempDir {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir(dir.path().join("prefs.nib")).unwrap();
		dir
	}

	#[test]
	fn flags_override_environment() {
		let mut args = args("prefs");
		args.renderer = Some(PathBuf::from("/flag/tm_dialog2"));
		args.nib_dir = Some(PathBuf::from("/flag/nibs"));
		args.timeout = Some(5);
		args.escape = true;

		let config = resolve_config(&args, |key| match key {
			"DIALOG" => Some("/env/tm_dialog2".to_string()),
			"TM_BUNDLE_SUPPORT" => Some("/env/support".to_string()),
			_ => None,
		})
		.unwrap();

		assert_eq!(config.dialog, PathBuf::from("/flag/tm_dialog2"));
		assert_eq!(config.nib_dir, PathBuf::from("/flag/nibs"));
		assert_eq!(config.wait_timeout, Some(Duration::from_secs(5)));
		assert!(config.escape_model);
	}

	#[test]
	fn environment_fills_missing_flags() {
		let config = resolve_config(&args("prefs"), |key| match key {
			"DIALOG" => Some("/env/tm_dialog2".to_string()),
			"TM_BUNDLE_SUPPORT" => Some("/env/support".to_string()),
			_ => None,
		})
		.unwrap();

		assert_eq!(config.dialog, PathBuf::from("/env/tm_dialog2"));
		assert_eq!(config.nib_dir, PathBuf::from("/env/support/nibs"));
		assert_eq!(config.wait_timeout, None);
	}

	#[test]
	fn missing_nib_dir_is_reported() {
		let mut args = args("prefs");
		args.renderer = Some(PathBuf::from("/flag/tm_dialog2"));
		let err = resolve_config(&args, |_| None).unwrap_err();
		assert!(matches!(
			err,
			CliError::Runtime(tmdialog_runtime::Error::NibDirUnset)
		));
	}

	#[tokio::test]
	async fn close_on_action_ends_the_dialog() {
		let dir = nibs();
		let executor = Arc::new(ScriptedExecutor::new());
		executor.push_output("9");
		executor.push_output(event_document("save", Some("<key>name</key><string>x</string>")));
		executor.push_output(event_document("cancel", None));

		let mut args = args("prefs");
		args.on = vec!["save".to_string()];
		args.close_on = vec!["cancel".to_string()];

		let config = RendererConfig::new("tm_dialog2", dir.path());
		let mut session = build_session(&args, config, executor.clone());
		let summary = show(&args, &mut session).await.unwrap();

		assert_eq!(summary.dispatched, 2);
		assert_eq!(
			summary.stop,
			StopReason::Action {
				action: "cancel".to_string(),
				status: -1,
			}
		);
		assert_eq!(session.state(), SessionState::Disposed);

		let calls = executor.call_args();
		assert_eq!(calls[0][0], "nib");
		assert_eq!(calls[0][1], "--load");
		assert!(calls[0].contains(&r#"{ title = "Hi"; }"#.to_string()));
		assert_eq!(calls.last().unwrap(), &vec!["nib", "--dispose", "9"]);
	}

	#[tokio::test]
	async fn missing_nib_is_not_loaded() {
		let dir = nibs();
		let executor = Arc::new(ScriptedExecutor::new());
		let config = RendererConfig::new("tm_dialog2", dir.path());
		let args = args("absent");
		let mut session = build_session(&args, config, executor.clone());

		let err = show(&args, &mut session).await.unwrap_err();
		assert!(matches!(err, CliError::DialogNotLoaded { ref name, .. } if name == "absent"));
		assert!(executor.calls().is_empty());
	}

	#[test]
	fn event_lines_carry_action_and_model() {
		let model = PlistValue::Dict([("name".to_string(), PlistValue::from("x"))].into_iter().collect());
		let ctx = ActionContext::new("save", Some(&model));
		assert_eq!(event_line(&ctx), r#"{"action":"save","model":{"name":"x"}}"#);

		let ctx = ActionContext::new("ping", None);
		assert_eq!(event_line(&ctx), r#"{"action":"ping","model":null}"#);
	}

	#[test]
	fn stop_reasons_read_plainly() {
		assert_eq!(describe(&StopReason::Cancelled), "interrupted");
		assert_eq!(
			describe(&StopReason::Action {
				action: "closeWindow".to_string(),
				status: -1,
			}),
			"action 'closeWindow' returned -1"
		);
	}
}
