//! Action registry.
//!
//! Every event the renderer reports carries an action name in
//! `eventInfo.type`. The registry maps those names to behavior and turns the
//! callback's return value into the loop's continue/stop decision: a
//! negative status ends [`DialogSession::run`](crate::DialogSession::run).

use std::collections::HashMap;
use std::fmt;

use tmdialog_protocol::{ModelParams, PlistValue};

/// Status returned by the built-in close action.
pub const ACTION_CLOSE: i64 = -1;

/// Status used for events without a registered action.
pub const ACTION_CONTINUE: i64 = 0;

/// Action name the renderer reports when the window is closed.
pub const CLOSE_WINDOW: &str = "closeWindow";

/// Boxed action callback.
pub type ActionFn = Box<dyn FnMut(&mut ActionContext<'_>) -> i64 + Send>;

/// Behavior bound to an action name.
pub enum Action {
	/// Ends the run loop with [`ACTION_CLOSE`].
	Close,
	Custom(ActionFn),
}

impl Action {
	pub fn custom<F>(callback: F) -> Self
	where
		F: FnMut(&mut ActionContext<'_>) -> i64 + Send + 'static,
	{
		Action::Custom(Box::new(callback))
	}

	fn invoke(&mut self, ctx: &mut ActionContext<'_>) -> i64 {
		match self {
			Action::Close => ACTION_CLOSE,
			Action::Custom(callback) => callback(ctx),
		}
	}
}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::Close => f.write_str("Close"),
			Action::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// What a callback sees of the event that triggered it.
#[derive(Debug)]
pub struct ActionContext<'a> {
	action: &'a str,
	model: Option<&'a PlistValue>,
	update: Option<ModelParams>,
}

impl<'a> ActionContext<'a> {
	pub fn new(action: &'a str, model: Option<&'a PlistValue>) -> Self {
		Self {
			action,
			model,
			update: None,
		}
	}

	/// The action name from `eventInfo.type`.
	pub fn action(&self) -> &str {
		self.action
	}

	/// The event's `model` dict, if the renderer sent one.
	pub fn model(&self) -> Option<&'a PlistValue> {
		self.model
	}

	/// String field of the model, a shortcut for the common case.
	pub fn model_str(&self, key: &str) -> Option<&'a str> {
		self.model.and_then(|m| m.get(key)).and_then(PlistValue::as_str)
	}

	/// Queues a model update, sent to the renderer after the callback returns.
	///
	/// A later call replaces an earlier one.
	pub fn update(&mut self, params: ModelParams) {
		self.update = Some(params);
	}

	pub fn take_update(&mut self) -> Option<ModelParams> {
		self.update.take()
	}
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
	pub status: i64,
	pub handled: bool,
	pub update: Option<ModelParams>,
}

impl Dispatch {
	pub fn should_continue(&self) -> bool {
		self.status >= 0
	}
}

/// Action name to behavior.
///
/// [`CLOSE_WINDOW`] is bound to [`Action::Close`] on construction and can be
/// overridden like any other name.
#[derive(Debug)]
pub struct ActionRegistry {
	actions: HashMap<String, Action>,
}

impl Default for ActionRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl ActionRegistry {
	pub fn new() -> Self {
		let mut actions = HashMap::new();
		actions.insert(CLOSE_WINDOW.to_string(), Action::Close);
		Self { actions }
	}

	/// Binds `name`, replacing any previous binding.
	pub fn register(&mut self, name: impl Into<String>, action: Action) {
		self.actions.insert(name.into(), action);
	}

	pub fn contains(&self, name: &str) -> bool {
		self.actions.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.actions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}

	/// Runs the action bound to `name`, or reports [`ACTION_CONTINUE`].
	pub fn dispatch(&mut self, name: &str, model: Option<&PlistValue>) -> Dispatch {
		let Some(action) = self.actions.get_mut(name) else {
			return Dispatch {
				status: ACTION_CONTINUE,
				handled: false,
				update: None,
			};
		};

		let mut ctx = ActionContext::new(name, model);
		let status = action.invoke(&mut ctx);
		Dispatch {
			status,
			handled: true,
			update: ctx.take_update(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use indexmap::IndexMap;

	use super::*;

	#[test]
	fn close_window_is_preregistered() {
		let mut registry = ActionRegistry::new();
		assert!(registry.contains(CLOSE_WINDOW));

		let dispatch = registry.dispatch(CLOSE_WINDOW, None);
		assert_eq!(dispatch.status, ACTION_CLOSE);
		assert!(dispatch.handled);
		assert!(!dispatch.should_continue());
	}

	#[test]
	fn unknown_action_continues() {
		let mut registry = ActionRegistry::new();
		let dispatch = registry.dispatch("nope", None);
		assert_eq!(dispatch.status, ACTION_CONTINUE);
		assert!(!dispatch.handled);
		assert!(dispatch.should_continue());
	}

	#[test]
	fn custom_action_receives_model() {
		let mut registry = ActionRegistry::new();
		registry.register(
			"greet",
			Action::custom(|ctx| {
				assert_eq!(ctx.action(), "greet");
				match ctx.model_str("name") {
					Some("Ada") => 5,
					_ => -2,
				}
			}),
		);

		let mut map = IndexMap::new();
		map.insert("name".to_string(), PlistValue::from("Ada"));
		let model = PlistValue::Dict(map);

		assert_eq!(registry.dispatch("greet", Some(&model)).status, 5);
		assert_eq!(registry.dispatch("greet", None).status, -2);
	}

	#[test]
	fn registering_again_overwrites() {
		let calls = Arc::new(AtomicUsize::new(0));
		let mut registry = ActionRegistry::new();

		let seen = Arc::clone(&calls);
		registry.register(
			CLOSE_WINDOW,
			Action::custom(move |_| {
				seen.fetch_add(1, Ordering::SeqCst);
				ACTION_CONTINUE
			}),
		);

		assert_eq!(registry.len(), 1);
		assert_eq!(registry.dispatch(CLOSE_WINDOW, None).status, ACTION_CONTINUE);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn queued_update_is_returned() {
		let mut registry = ActionRegistry::new();
		registry.register(
			"refresh",
			Action::custom(|ctx| {
				ctx.update(ModelParams::new().with("status", "stale"));
				ctx.update(ModelParams::new().with("status", "fresh"));
				0
			}),
		);

		let dispatch = registry.dispatch("refresh", None);
		assert_eq!(
			dispatch.update,
			Some(ModelParams::new().with("status", "fresh"))
		);
	}
}
