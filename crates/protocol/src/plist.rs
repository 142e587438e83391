//! Plist XML decoding.
//!
//! The renderer emits Apple-style property lists. Decoding is permissive:
//! unknown elements become [`PlistValue::Null`] rather than errors, so newer
//! renderer output passes through an older decoder without ending a session.
//! Only documents that are not XML at all, or that carry no value element,
//! are rejected.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use roxmltree::{Document, Node, ParsingOptions};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use tracing::trace;

use crate::error::{Error, Result};
use crate::writer::PlistWriter;

/// Nesting limit applied by [`PlistDecoder::new`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest nesting limit a decoder accepts. Decoding recurses once per
/// container level, so this bounds stack use.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// A decoded plist value.
///
/// `Integer`, `Data` and `Date` keep the element text verbatim. Use
/// [`PlistValue::as_i64`] or [`PlistValue::as_data_bytes`] to interpret it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlistValue {
	String(String),
	Integer(String),
	Bool(bool),
	Data(String),
	Date(String),
	Array(Vec<PlistValue>),
	Dict(IndexMap<String, PlistValue>),
	/// Unknown or unsupported element.
	#[default]
	Null,
}

impl PlistValue {
	/// Text of a `String` value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			PlistValue::String(s) => Some(s),
			_ => None,
		}
	}

	/// Raw element text of `String`, `Integer`, `Data` and `Date` values.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			PlistValue::String(s)
			| PlistValue::Integer(s)
			| PlistValue::Data(s)
			| PlistValue::Date(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			PlistValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Parses an `Integer` value's text.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			PlistValue::Integer(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// Decodes the base64 payload of a `Data` value, ignoring embedded whitespace.
	pub fn as_data_bytes(&self) -> Option<Vec<u8>> {
		match self {
			PlistValue::Data(text) => {
				let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
				STANDARD.decode(compact).ok()
			}
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[PlistValue]> {
		match self {
			PlistValue::Array(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&IndexMap<String, PlistValue>> {
		match self {
			PlistValue::Dict(map) => Some(map),
			_ => None,
		}
	}

	/// Looks up `key` if this is a `Dict`.
	pub fn get(&self, key: &str) -> Option<&PlistValue> {
		self.as_dict().and_then(|map| map.get(key))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, PlistValue::Null)
	}

	/// True for `Null` and for containers without entries.
	pub fn is_empty(&self) -> bool {
		match self {
			PlistValue::Null => true,
			PlistValue::Array(items) => items.is_empty(),
			PlistValue::Dict(map) => map.is_empty(),
			_ => false,
		}
	}

	/// Renders this value as a complete plist XML document.
	pub fn to_xml(&self) -> String {
		PlistWriter::new().write_document(self)
	}
}

impl From<&str> for PlistValue {
	fn from(value: &str) -> Self {
		PlistValue::String(value.to_string())
	}
}

impl From<String> for PlistValue {
	fn from(value: String) -> Self {
		PlistValue::String(value)
	}
}

impl From<bool> for PlistValue {
	fn from(value: bool) -> Self {
		PlistValue::Bool(value)
	}
}

impl From<i64> for PlistValue {
	fn from(value: i64) -> Self {
		PlistValue::Integer(value.to_string())
	}
}

impl Serialize for PlistValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			PlistValue::String(s) | PlistValue::Data(s) | PlistValue::Date(s) => {
				serializer.serialize_str(s)
			}
			PlistValue::Integer(text) => match text.trim().parse::<i64>() {
				Ok(n) => serializer.serialize_i64(n),
				Err(_) => serializer.serialize_str(text),
			},
			PlistValue::Bool(b) => serializer.serialize_bool(*b),
			PlistValue::Array(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			PlistValue::Dict(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					map.serialize_entry(key, value)?;
				}
				map.end()
			}
			PlistValue::Null => serializer.serialize_unit(),
		}
	}
}

/// Element names the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
	Dict,
	Array,
	Key,
	String,
	Integer,
	Data,
	Date,
	True,
	False,
	Unknown,
}

impl Tag {
	pub fn from_name(name: &str) -> Self {
		match name {
			"dict" => Tag::Dict,
			"array" => Tag::Array,
			"key" => Tag::Key,
			"string" => Tag::String,
			"integer" => Tag::Integer,
			"data" => Tag::Data,
			"date" => Tag::Date,
			"true" => Tag::True,
			"false" => Tag::False,
			_ => Tag::Unknown,
		}
	}
}

/// Converts plist XML into [`PlistValue`] trees.
#[derive(Debug, Clone, Copy)]
pub struct PlistDecoder {
	max_depth: usize,
}

impl Default for PlistDecoder {
	fn default() -> Self {
		Self::new()
	}
}

impl PlistDecoder {
	pub fn new() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Sets the maximum container nesting accepted before failing with
	/// [`Error::NestingTooDeep`]. Values above [`MAX_DEPTH_CEILING`] are
	/// clamped to it.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
		self
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Decodes a plist document.
	///
	/// The value is taken from the first element child of the document
	/// element (normally `<plist>`).
	///
	/// # Errors
	///
	/// - [`Error::MalformedDocument`] if `xml` is not well-formed
	/// - [`Error::MissingRoot`] if the document element has no element child
	/// - [`Error::DanglingKey`] if a dict key has no value element
	/// - [`Error::NestingTooDeep`] if containers nest beyond the limit
	pub fn process(&self, xml: &str) -> Result<PlistValue> {
		let mut options = ParsingOptions::default();
		options.allow_dtd = true;

		let doc = Document::parse_with_options(xml, options)?;
		let root = doc
			.root_element()
			.first_element_child()
			.ok_or(Error::MissingRoot)?;

		self.decode_node(root, 0)
	}

	fn decode_node(&self, node: Node<'_, '_>, depth: usize) -> Result<PlistValue> {
		let name = node.tag_name().name();
		let value = match Tag::from_name(name) {
			Tag::String => PlistValue::String(text_content(node)),
			Tag::Integer => PlistValue::Integer(text_content(node)),
			Tag::Data => PlistValue::Data(text_content(node)),
			Tag::Date => PlistValue::Date(text_content(node)),
			Tag::True => PlistValue::Bool(true),
			Tag::False => PlistValue::Bool(false),
			Tag::Dict => self.decode_dict(node, self.descend(depth)?)?,
			Tag::Array => self.decode_array(node, self.descend(depth)?)?,
			Tag::Key | Tag::Unknown => {
				trace!(target = "tmdialog::plist", tag = name, "no decoder for element");
				PlistValue::Null
			}
		};
		Ok(value)
	}

	fn descend(&self, depth: usize) -> Result<usize> {
		let next = depth + 1;
		if next > self.max_depth {
			return Err(Error::NestingTooDeep {
				limit: self.max_depth,
			});
		}
		Ok(next)
	}

	fn decode_dict(&self, node: Node<'_, '_>, depth: usize) -> Result<PlistValue> {
		let mut map = IndexMap::new();

		for child in node.children().filter(|c| c.is_element()) {
			if child.tag_name().name() != "key" {
				continue;
			}

			let key = text_content(child);
			let value_node = child
				.next_sibling_element()
				.ok_or_else(|| Error::DanglingKey { key: key.clone() })?;
			let value = self.decode_node(value_node, depth)?;

			// Duplicate keys keep their first position and take the last value.
			map.insert(key, value);
		}

		Ok(PlistValue::Dict(map))
	}

	fn decode_array(&self, node: Node<'_, '_>, depth: usize) -> Result<PlistValue> {
		node.children()
			.filter(|c| c.is_element())
			.map(|child| self.decode_node(child, depth))
			.collect::<Result<Vec<_>>>()
			.map(PlistValue::Array)
	}
}

/// Concatenated text of every text node below `node`.
fn text_content(node: Node<'_, '_>) -> String {
	node.descendants()
		.filter(|n| n.is_text())
		.filter_map(|n| n.text())
		.collect()
}
