//! Plist XML rendering.
//!
//! Output follows the layout Apple tools produce: XML declaration, DOCTYPE,
//! a `<plist version="1.0">` wrapper and tab indentation. [`PlistValue::Null`]
//! is written as `<null/>`, which the decoder reads back as `Null`.
//!
//! Carriage returns are written as `&#13;` so XML line-end normalization
//! does not turn them into `\n` on re-parse. Control characters XML 1.0
//! cannot carry at all are replaced with U+FFFD; text containing them does
//! not survive a round trip.

use std::fmt::Write;

use crate::plist::PlistValue;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
	<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
	\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
	<plist version=\"1.0\">\n";

/// Renders [`PlistValue`] trees as plist XML.
#[derive(Debug, Clone, Default)]
pub struct PlistWriter {
	out: String,
}

impl PlistWriter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Renders `value` wrapped in a full plist document.
	pub fn write_document(mut self, value: &PlistValue) -> String {
		self.out.push_str(HEADER);
		self.write_value(value, 0);
		self.out.push_str("</plist>\n");
		self.out
	}

	/// Renders `value` as a bare element without the document wrapper.
	pub fn write_fragment(mut self, value: &PlistValue) -> String {
		self.write_value(value, 0);
		self.out
	}

	fn write_value(&mut self, value: &PlistValue, indent: usize) {
		self.pad(indent);
		match value {
			PlistValue::String(s) => self.leaf("string", s),
			PlistValue::Integer(s) => self.leaf("integer", s),
			PlistValue::Data(s) => self.leaf("data", s),
			PlistValue::Date(s) => self.leaf("date", s),
			PlistValue::Bool(true) => self.out.push_str("<true/>\n"),
			PlistValue::Bool(false) => self.out.push_str("<false/>\n"),
			PlistValue::Null => self.out.push_str("<null/>\n"),
			PlistValue::Array(items) if items.is_empty() => self.out.push_str("<array/>\n"),
			PlistValue::Array(items) => {
				self.out.push_str("<array>\n");
				for item in items {
					self.write_value(item, indent + 1);
				}
				self.pad(indent);
				self.out.push_str("</array>\n");
			}
			PlistValue::Dict(map) if map.is_empty() => self.out.push_str("<dict/>\n"),
			PlistValue::Dict(map) => {
				self.out.push_str("<dict>\n");
				for (key, item) in map {
					self.pad(indent + 1);
					self.leaf("key", key);
					self.write_value(item, indent + 1);
				}
				self.pad(indent);
				self.out.push_str("</dict>\n");
			}
		}
	}

	fn leaf(&mut self, tag: &str, text: &str) {
		let _ = writeln!(self.out, "<{tag}>{}</{tag}>", escape(text));
	}

	fn pad(&mut self, indent: usize) {
		for _ in 0..indent {
			self.out.push('\t');
		}
	}
}

fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\r' => escaped.push_str("&#13;"),
			'\t' | '\n' => escaped.push(c),
			c if is_xml_char(c) => escaped.push(c),
			_ => escaped.push(char::REPLACEMENT_CHARACTER),
		}
	}
	escaped
}

/// XML 1.0 `Char` production, excluding the whitespace handled above.
fn is_xml_char(c: char) -> bool {
	matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
