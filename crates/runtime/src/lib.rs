//! tmdialog runtime - renderer plumbing and the dialog session loop
//!
//! This crate drives TextMate's `tmdialog` renderer, one short-lived process
//! per request:
//!
//! - **Config**: locating the renderer and nib bundles ([`RendererConfig`])
//! - **Executor**: running commands without a shell ([`ShellExecutor`])
//! - **Commands**: the `nib --load/--update/--dispose/--wait` lines
//! - **Session**: token lifecycle and the wait/decode/dispatch loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  DialogSession   │  load / update / run / dispose
//! │  ┌────────────┐  │
//! │  │ Actions    │  │  eventInfo.type -> callback -> status
//! │  └────────────┘  │
//! │  ┌────────────┐  │
//! │  │ Decoder    │  │  plist reply -> PlistValue (tmdialog-protocol)
//! │  └────────────┘  │
//! └────────┬─────────┘
//!          │ CommandLine
//! ┌────────▼─────────┐
//! │  ShellExecutor   │  tokio::process, or a scripted double in tests
//! └──────────────────┘
//! ```

pub mod actions;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod locate;
pub mod session;
pub mod testing;
pub mod textutil;

pub use actions::{
	ACTION_CLOSE, ACTION_CONTINUE, Action, ActionContext, ActionFn, ActionRegistry, CLOSE_WINDOW,
	Dispatch,
};
pub use command::RendererCommand;
pub use config::RendererConfig;
pub use error::{Error, Result};
pub use executor::{CommandLine, ProcessExecutor, ShellExecutor};
pub use locate::find_renderer;
pub use session::{DialogSession, RunSummary, SessionState, SessionToken, StopReason};
pub use tmdialog_protocol::{ModelParams, PlistDecoder, PlistValue};
pub use tokio_util::sync::CancellationToken;
