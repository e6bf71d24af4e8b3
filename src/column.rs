//! Column interface and shared helpers
//!
//! A column renders one header cell per table and one body cell per
//! item, and editable columns additionally bind submitted input back
//! onto items. [`ColumnBase`] carries the state and helpers every
//! concrete column shares: name, title, per-item identifier derivation,
//! and annotation namespacing.

use std::sync::Arc;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde_json::Value;

use crate::error::ColumnError;
use crate::formatter::{AnnotationKey, Formatter};

// Characters that pass through the safe-id encoding unchanged. ASCII
// only, so non-ASCII text is always encoded. `=` is deliberately
// excluded so every base64 output (padded with `=`) is distinguishable
// from a string that was already safe.
static SAFE_ID: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_ +/]*$").expect("SAFE_ID: invalid regex pattern"));

/// Encode `s` into a token usable in HTML attribute names and as a
/// mapping key.
///
/// Strings made of word characters, spaces, `+`, and `/` pass through
/// unchanged; anything else is base64-encoded. Base64 is avoided where
/// possible because it makes rendered HTML harder to read and test
/// against.
///
/// Not idempotent: a safe-looking string may itself be legal base64
/// output, so encode raw item representations exactly once.
///
/// # Examples
///
/// ```
/// use grid_columns::to_safe;
///
/// assert_eq!(to_safe("hello world"), "hello world");
/// assert_eq!(to_safe("a=b"), "YT1i");
/// ```
pub fn to_safe(s: &str) -> String {
	if SAFE_ID.is_match(s) {
		s.to_string()
	} else {
		STANDARD.encode(s.as_bytes())
	}
}

/// Escape a string for use in HTML text or attribute values.
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

// Canonical string rendering of an item for identifier derivation.
fn item_repr(item: &Value) -> String {
	match item {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// A rendering and binding unit producing one header cell per table
/// and one body cell per item.
pub trait Column: Send + Sync {
	fn name(&self) -> &str;

	fn title(&self) -> &str;

	/// Render the header cell. Defaults to the escaped title.
	fn render_header(&self, _formatter: &Formatter) -> String {
		html_escape(self.title())
	}

	/// Render the body cell for `item`.
	fn render_cell(&self, item: &Value, formatter: &Formatter) -> Result<String, ColumnError>;
}

/// Closure deriving a stable per-item identifier.
pub type IdFn = Arc<dyn Fn(&Value, &Formatter) -> String + Send + Sync>;

/// Shared helper state embedded by the concrete column types.
///
/// Identifiers must be stable within a render pass and unique among
/// sibling items; collisions corrupt input mapping and widget
/// prefixing. The default derivation feeds the item's canonical string
/// form through [`to_safe`]; columns whose items carry a natural key
/// should install an id closure instead.
pub struct ColumnBase {
	name: String,
	title: String,
	scope: &'static str,
	id_fn: Option<IdFn>,
}

impl ColumnBase {
	/// `scope` namespaces annotation keys per defining column type;
	/// concrete columns pass their own `type_name`.
	pub fn new(title: impl Into<String>, name: impl Into<String>, scope: &'static str) -> Self {
		Self {
			name: name.into(),
			title: title.into(),
			scope,
			id_fn: None,
		}
	}
	pub fn name(&self) -> &str {
		&self.name
	}
	pub fn title(&self) -> &str {
		&self.title
	}
	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}
	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = title.into();
	}
	pub fn set_id_fn(&mut self, id_fn: IdFn) {
		self.id_fn = Some(id_fn);
	}
	/// Stable identifier for `item`, safe for HTML attribute names.
	pub fn item_id(&self, item: &Value, formatter: &Formatter) -> String {
		match &self.id_fn {
			Some(id_fn) => id_fn(item, formatter),
			None => to_safe(&item_repr(item)),
		}
	}
	/// Input-name prefix for `item`: the formatter prefix joined with
	/// the item id, dot-separated.
	pub fn item_prefix(&self, item: &Value, formatter: &Formatter) -> String {
		let id = self.item_id(item, formatter);
		if formatter.prefix().is_empty() {
			id
		} else {
			format!("{}.{}", formatter.prefix(), id)
		}
	}
	/// Annotation key scoped to this column (not to any item).
	pub fn annotation_key(&self, name: &'static str) -> AnnotationKey {
		AnnotationKey::new(self.scope, self.name.clone(), name)
	}
	pub fn set_annotation(&self, name: &'static str, value: Value, formatter: &mut Formatter) {
		formatter.set_annotation(self.annotation_key(name), value);
	}
	pub fn annotation<'f>(&self, name: &'static str, formatter: &'f Formatter) -> Option<&'f Value> {
		formatter.annotation(&self.annotation_key(name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn safe_strings_pass_through() {
		assert_eq!(to_safe("hello world"), "hello world");
		assert_eq!(to_safe("a+b/c_d 9"), "a+b/c_d 9");
		assert_eq!(to_safe(""), "");
	}

	#[test]
	fn unsafe_strings_are_encoded_and_decodable() {
		let encoded = to_safe("a=b");
		assert_eq!(encoded, "YT1i");
		assert_eq!(to_safe("a=b"), encoded);
		assert_eq!(STANDARD.decode(&encoded).unwrap(), b"a=b");
	}

	#[test]
	fn non_ascii_strings_are_encoded() {
		assert_eq!(to_safe("café"), "Y2Fmw6k=");
		assert_eq!(STANDARD.decode("Y2Fmw6k=").unwrap(), "café".as_bytes());
	}

	#[test]
	fn encoding_is_not_idempotent() {
		// "YT1i" is safe, so a second pass leaves it alone; the two
		// distinct raw strings "a=b" and "YT1i" therefore collide.
		assert_eq!(to_safe(&to_safe("a=b")), "YT1i");
	}

	#[test]
	fn typical_ids_stay_distinct() {
		let corpus = [
			"tom", "ana", "a=b", "a-b", "a.b", "x/y", "hello world", "item<1>", "item<2>",
		];
		let mut seen = std::collections::HashSet::new();
		for raw in corpus {
			assert!(seen.insert(to_safe(raw)), "collision for {raw:?}");
		}
	}

	#[test]
	fn html_escape_covers_attribute_metacharacters() {
		assert_eq!(
			html_escape(r#"<a href="x">&'"#),
			"&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
		);
	}

	#[test]
	fn item_repr_uses_raw_strings_and_json_otherwise() {
		assert_eq!(item_repr(&Value::String("tom".into())), "tom");
		assert_eq!(item_repr(&serde_json::json!({"id": 1})), r#"{"id":1}"#);
	}
}
