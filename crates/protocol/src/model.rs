//! Model expressions passed to `tmdialog nib --model`.
//!
//! The renderer reads dialog state as `{ key = "value"; ... }`. [`to_model`]
//! embeds values verbatim: a value containing `"` ends its string early and
//! the rest is read as model syntax. Use [`to_model_escaped`] when values
//! come from untrusted input.

use std::fmt::{Display, Write};

use indexmap::IndexMap;

/// Ordered parameter map rendered into a model expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelParams(IndexMap<String, String>);

impl ModelParams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a parameter, keeping the original position on replace.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
		self.0.insert(key.into(), value.to_string());
		self
	}

	/// Builder form of [`ModelParams::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.insert(key, value);
		self
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Renders the unescaped model expression.
	pub fn to_model(&self) -> String {
		to_model(self.iter())
	}

	/// Renders the model expression with quotes and backslashes escaped.
	pub fn to_model_escaped(&self) -> String {
		to_model_escaped(self.iter())
	}
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for ModelParams {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = ModelParams::new();
		for (key, value) in iter {
			params.insert(key, value);
		}
		params
	}
}

/// Renders `key = "value"; ` for each pair, wrapped in `{ ` and `}`.
///
/// An empty input yields `{ }`.
pub fn to_model<I, K, V>(params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: Display,
	V: Display,
{
	render(params, |value, out| {
		let _ = write!(out, "{value}");
	})
}

/// Like [`to_model`], but escapes `\` and `"` inside values.
pub fn to_model_escaped<I, K, V>(params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: Display,
	V: Display,
{
	render(params, |value, out| {
		for c in value.to_string().chars() {
			if matches!(c, '"' | '\\') {
				out.push('\\');
			}
			out.push(c);
		}
	})
}

fn render<I, K, V, F>(params: I, mut push_value: F) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: Display,
	V: Display,
	F: FnMut(&V, &mut String),
{
	let mut model = String::from("{ ");
	for (key, value) in params {
		let _ = write!(model, "{key} = \"");
		push_value(&value, &mut model);
		model.push_str("\"; ");
	}
	model.push('}');
	model
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_pairs_in_order() {
		assert_eq!(to_model([("a", "b"), ("c", "d")]), r#"{ a = "b"; c = "d"; }"#);
	}

	#[test]
	fn empty_params_render_braces() {
		assert_eq!(to_model(Vec::<(&str, &str)>::new()), "{ }");
		assert_eq!(ModelParams::new().to_model(), "{ }");
	}

	#[test]
	fn non_string_values_use_display() {
		let params = ModelParams::new().with("count", 3).with("ok", true);
		assert_eq!(params.to_model(), r#"{ count = "3"; ok = "true"; }"#);
	}

	#[test]
	fn raw_model_does_not_escape() {
		assert_eq!(to_model([("t", r#"say "hi""#)]), r#"{ t = "say "hi""; }"#);
	}

	#[test]
	fn escaped_model_escapes_quotes_and_backslashes() {
		assert_eq!(
			to_model_escaped([("t", r#"say "hi" \o/"#)]),
			r#"{ t = "say \"hi\" \\o/"; }"#
		);
	}

	#[test]
	fn replacing_a_param_keeps_position() {
		let mut params = ModelParams::new();
		params.insert("first", 1).insert("second", 2).insert("first", 3);
		assert_eq!(params.to_model(), r#"{ first = "3"; second = "2"; }"#);
		assert_eq!(params.len(), 2);
		assert_eq!(params.get("first"), Some("3"));
	}

	#[test]
	fn collects_from_iterator() {
		let params: ModelParams = vec![("x", "1"), ("y", "2")].into_iter().collect();
		assert_eq!(params.to_model(), r#"{ x = "1"; y = "2"; }"#);
	}
}
