//! Error types for plist decoding.

use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding renderer output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	/// Input is not well-formed XML.
	#[error("Malformed plist document: {0}")]
	MalformedDocument(String),

	/// The document element has no element child to decode.
	#[error("Malformed plist document: no root value element")]
	MissingRoot,

	/// A `<key>` inside a `<dict>` is not followed by a value element.
	#[error("Malformed plist document: key '{key}' has no value")]
	DanglingKey { key: String },

	/// Container nesting exceeded the decoder's depth limit.
	#[error("Plist nesting exceeds {limit} levels")]
	NestingTooDeep { limit: usize },
}

impl From<roxmltree::Error> for Error {
	fn from(err: roxmltree::Error) -> Self {
		Error::MalformedDocument(err.to_string())
	}
}
