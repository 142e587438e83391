//! Wire formats spoken with the `tmdialog` renderer.
//!
//! The renderer answers every `--wait` with an Apple-style plist XML
//! document and accepts dialog state as a flat model expression of the form
//! `{ key = "value"; }`. This crate holds both directions:
//!
//! - [`PlistDecoder`] turns plist XML into a [`PlistValue`] tree
//! - [`PlistWriter`] renders a [`PlistValue`] back into plist XML
//! - [`to_model`] and [`ModelParams`] build model expressions
//!
//! Types here are pure data plus parsing. Process handling and the session
//! loop live in `tmdialog-runtime`.

pub mod error;
pub mod model;
pub mod plist;
pub mod writer;

pub use error::{Error, Result};
pub use model::{ModelParams, to_model, to_model_escaped};
pub use plist::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING, PlistDecoder, PlistValue, Tag};
pub use writer::PlistWriter;
