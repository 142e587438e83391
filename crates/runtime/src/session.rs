//! Dialog session lifecycle and event loop.
//!
//! A [`DialogSession`] owns one renderer dialog:
//!
//! ```text
//! Unloaded --load()--> Loaded --run()--> Running --(status < 0 | empty reply)--> Loaded
//!                                                                                  |
//!                                                                             dispose()
//!                                                                                  v
//!                                                                              Disposed
//! ```
//!
//! `run()` repeats one cycle: `nib --wait <token>`, decode the plist reply,
//! look up `eventInfo.type` in the [`ActionRegistry`], call the action with
//! `model`. The loop stops on a negative status, on a reply that is empty or
//! cannot be decoded, on cancellation, or when the optional wait timeout
//! expires. It never disposes the dialog; call [`DialogSession::dispose`]
//! afterwards.

use std::fmt;
use std::sync::Arc;

use tmdialog_protocol::{ModelParams, PlistDecoder, PlistValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{Action, ActionContext, ActionRegistry};
use crate::command::RendererCommand;
use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::executor::{CommandLine, ShellExecutor};

/// Renderer-assigned dialog id. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(i64);

impl SessionToken {
	/// Parses `nib --load` output.
	///
	/// Leading whitespace is skipped and the longest `[+-]?[0-9]+` prefix is
	/// read, so `"42\n"` and `"42 extra"` both yield 42. Values that do not
	/// parse, or are not positive, yield `None`.
	pub fn parse(raw: &str) -> Option<Self> {
		let trimmed = raw.trim_start();
		let end = trimmed
			.char_indices()
			.find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && matches!(c, '+' | '-'))))
			.map_or(trimmed.len(), |(i, _)| i);

		trimmed[..end]
			.parse::<i64>()
			.ok()
			.filter(|value| *value > 0)
			.map(SessionToken)
	}

	pub fn value(&self) -> i64 {
		self.0
	}
}

impl fmt::Display for SessionToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Unloaded,
	Loaded,
	Running,
	Disposed,
}

/// Why [`DialogSession::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
	/// An action returned a negative status.
	Action { action: String, status: i64 },
	/// The renderer replied with nothing usable.
	EmptyResponse,
	/// The session's cancellation token fired.
	Cancelled,
	/// A wait exceeded [`RendererConfig::wait_timeout`].
	TimedOut,
}

/// Outcome of a finished run loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
	/// Number of wait cycles started.
	pub iterations: usize,
	/// Number of events handed to a registered action.
	pub dispatched: usize,
	pub stop: StopReason,
}

enum WaitOutcome {
	Reply(Vec<u8>),
	Failed,
	Cancelled,
	TimedOut,
}

/// One renderer dialog and its registered actions.
pub struct DialogSession {
	config: RendererConfig,
	executor: Arc<dyn ShellExecutor>,
	decoder: PlistDecoder,
	actions: ActionRegistry,
	token: Option<SessionToken>,
	state: SessionState,
	cancel: CancellationToken,
}

impl fmt::Debug for DialogSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DialogSession")
			.field("config", &self.config)
			.field("actions", &self.actions)
			.field("token", &self.token)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl DialogSession {
	pub fn new(config: RendererConfig, executor: Arc<dyn ShellExecutor>) -> Self {
		Self {
			config,
			executor,
			decoder: PlistDecoder::new(),
			actions: ActionRegistry::new(),
			token: None,
			state: SessionState::Unloaded,
			cancel: CancellationToken::new(),
		}
	}

	/// Replaces the decoder used for wait replies.
	pub fn with_decoder(mut self, decoder: PlistDecoder) -> Self {
		self.decoder = decoder;
		self
	}

	pub fn config(&self) -> &RendererConfig {
		&self.config
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub fn token(&self) -> Option<SessionToken> {
		self.token
	}

	/// Token that stops [`DialogSession::run`] when cancelled.
	///
	/// Cancellation is sticky: once fired, later runs stop before waiting.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Binds `name` to `callback`, replacing any previous binding.
	pub fn register_action<F>(&mut self, name: impl Into<String>, callback: F)
	where
		F: FnMut(&mut ActionContext<'_>) -> i64 + Send + 'static,
	{
		self.actions.register(name, Action::custom(callback));
	}

	/// Binds `name` to a prepared [`Action`].
	pub fn register(&mut self, name: impl Into<String>, action: Action) {
		self.actions.register(name, action);
	}

	pub fn actions(&self) -> &ActionRegistry {
		&self.actions
	}

	/// Renders `params` as a model expression, escaped if configured.
	pub fn to_model(&self, params: &ModelParams) -> String {
		if self.config.escape_model {
			params.to_model_escaped()
		} else {
			params.to_model()
		}
	}

	/// Opens `dialog` with an initial model.
	///
	/// Returns `false` without contacting the renderer when the nib bundle is
	/// not a directory. Otherwise the renderer's output becomes the session
	/// token; a missing or non-positive token also returns `false` and leaves
	/// the session unloaded.
	pub async fn load(&mut self, dialog: &str, params: &ModelParams) -> bool {
		let nib = self.config.nib_path(dialog);
		if !nib.is_dir() {
			warn!(target = "tmdialog", nib = %nib.display(), "nib not found");
			return false;
		}

		let command = RendererCommand::Load {
			nib,
			model: self.to_model(params),
		};
		let line = command.to_command_line(&self.config.dialog);
		debug!(target = "tmdialog", command = %line, "loading dialog");

		let output = match self.executor.execute(&line, None, false).await {
			Ok(output) => output,
			Err(e) => {
				warn!(target = "tmdialog", error = %e, "renderer load failed");
				self.token = None;
				self.state = SessionState::Unloaded;
				return false;
			}
		};

		let raw = String::from_utf8_lossy(&output);
		match SessionToken::parse(&raw) {
			Some(token) => {
				info!(target = "tmdialog", dialog, %token, "dialog loaded");
				self.token = Some(token);
				self.state = SessionState::Loaded;
				true
			}
			None => {
				warn!(
					target = "tmdialog",
					dialog,
					output = raw.trim(),
					"renderer returned no usable token"
				);
				self.token = None;
				self.state = SessionState::Unloaded;
				false
			}
		}
	}

	/// Sends a new model to the dialog.
	///
	/// Renderer failures are logged and otherwise ignored. Without a token
	/// this does nothing.
	pub async fn update(&self, params: &ModelParams) {
		let Some(token) = self.token else {
			debug!(target = "tmdialog", "update ignored: dialog not loaded");
			return;
		};

		let command = RendererCommand::Update {
			token,
			model: self.to_model(params),
		};
		self.fire_and_forget(&command).await;
	}

	/// Closes the dialog and forgets the token.
	///
	/// Safe to call whether or not [`DialogSession::run`] was entered, and
	/// more than once.
	pub async fn dispose(&mut self) {
		if let Some(token) = self.token.take() {
			self.fire_and_forget(&RendererCommand::Dispose { token }).await;
			info!(target = "tmdialog", %token, "dialog disposed");
		}
		self.state = SessionState::Disposed;
	}

	async fn fire_and_forget(&self, command: &RendererCommand) {
		let line = command.to_command_line(&self.config.dialog);
		debug!(target = "tmdialog", command = %line, "sending {}", command.name());
		if let Err(e) = self.executor.execute(&line, None, false).await {
			warn!(
				target = "tmdialog",
				command = command.name(),
				error = %e,
				"renderer command failed"
			);
		}
	}

	/// Waits for dialog events and dispatches them until told to stop.
	///
	/// # Errors
	///
	/// Returns [`Error::NotLoaded`] if the session has no token. Renderer
	/// failures and undecodable replies end the loop with
	/// [`StopReason::EmptyResponse`] instead of an error.
	pub async fn run(&mut self) -> Result<RunSummary> {
		let token = self.token.ok_or(Error::NotLoaded)?;
		let wait = RendererCommand::Wait { token }.to_command_line(&self.config.dialog);

		self.state = SessionState::Running;
		let mut iterations = 0;
		let mut dispatched = 0;

		let stop = loop {
			iterations += 1;
			let reply = match self.wait(&wait).await {
				WaitOutcome::Reply(reply) => reply,
				WaitOutcome::Failed => break StopReason::EmptyResponse,
				WaitOutcome::Cancelled => break StopReason::Cancelled,
				WaitOutcome::TimedOut => break StopReason::TimedOut,
			};

			let Some(event) = self.decode_event(&reply) else {
				break StopReason::EmptyResponse;
			};

			let action = event
				.get("eventInfo")
				.and_then(|info| info.get("type"))
				.and_then(PlistValue::as_str)
				.unwrap_or("");
			let model = event.get("model");

			debug!(target = "tmdialog", action, "dialog event");
			let dispatch = self.actions.dispatch(action, model);
			if dispatch.handled {
				dispatched += 1;
			}

			if let Some(params) = dispatch.update.as_ref() {
				self.update(params).await;
			}

			if !dispatch.should_continue() {
				break StopReason::Action {
					action: action.to_string(),
					status: dispatch.status,
				};
			}
		};

		self.state = SessionState::Loaded;
		info!(target = "tmdialog", iterations, ?stop, "run loop finished");

		Ok(RunSummary {
			iterations,
			dispatched,
			stop,
		})
	}

	async fn wait(&self, line: &CommandLine) -> WaitOutcome {
		if self.cancel.is_cancelled() {
			return WaitOutcome::Cancelled;
		}

		debug!(target = "tmdialog", command = %line, "waiting for dialog event");
		let timeout = self.config.wait_timeout;
		let request = async {
			let exec = self.executor.execute(line, None, false);
			match timeout {
				Some(limit) => tokio::time::timeout(limit, exec)
					.await
					.unwrap_or(Err(Error::Timeout(limit))),
				None => exec.await,
			}
		};

		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => WaitOutcome::Cancelled,
			result = request => match result {
				Ok(reply) => WaitOutcome::Reply(reply),
				Err(e) if e.is_timeout() => {
					warn!(target = "tmdialog", error = %e, "wait timed out");
					WaitOutcome::TimedOut
				}
				Err(e) => {
					warn!(target = "tmdialog", error = %e, "wait failed");
					WaitOutcome::Failed
				}
			},
		}
	}

	/// Decodes a wait reply, or `None` if it signals the end of the dialog.
	fn decode_event(&self, reply: &[u8]) -> Option<PlistValue> {
		let text = String::from_utf8_lossy(reply);
		if text.trim().is_empty() {
			debug!(target = "tmdialog", "renderer sent an empty reply");
			return None;
		}

		match self.decoder.process(&text) {
			Ok(value @ (PlistValue::Dict(_) | PlistValue::Array(_))) if !value.is_empty() => {
				Some(value)
			}
			Ok(_) => {
				debug!(target = "tmdialog", "renderer sent an empty event");
				None
			}
			Err(e) => {
				warn!(target = "tmdialog", error = %e, "undecodable renderer reply");
				None
			}
		}
	}
}
