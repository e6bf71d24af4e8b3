//! Reference field and widget fixtures
//!
//! Minimal [`SchemaField`] and [`Widget`] implementations exercising
//! the column protocol in tests and documentation examples. A real
//! application supplies its own field types and widget factories; these
//! fixtures cover a single text field with an input and a display
//! widget.

use std::sync::Arc;

use serde_json::Value;

use crate::column::html_escape;
use crate::error::WidgetInputError;
use crate::field::SchemaField;
use crate::formatter::Request;
use crate::widget::{Widget, WidgetMode, WidgetRegistry};

/// Plain text field reading and writing one key of an object item.
#[derive(Debug, Clone)]
pub struct TextField {
	name: String,
	title: String,
	readonly: bool,
	required: bool,
}

impl TextField {
	pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: title.into(),
			readonly: false,
			required: false,
		}
	}
	pub fn readonly(mut self) -> Self {
		self.readonly = true;
		self
	}
	/// Required fields reject empty submissions.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl SchemaField for TextField {
	fn name(&self) -> &str {
		&self.name
	}
	fn title(&self) -> &str {
		&self.title
	}
	fn kind(&self) -> &str {
		"text"
	}
	fn readonly(&self) -> bool {
		self.readonly
	}
	fn required(&self) -> bool {
		self.required
	}
	fn get(&self, item: &Value) -> Value {
		item.get(self.name.as_str()).cloned().unwrap_or(Value::Null)
	}
	fn set(&self, item: &mut Value, value: Value) {
		if let Value::Object(map) = item {
			map.insert(self.name.clone(), value);
		}
	}
	fn bind(&self, _context: &Value) -> Arc<dyn SchemaField> {
		Arc::new(self.clone())
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Input-capable text widget.
///
/// Its full input name is the prefix joined with the field name; input
/// presence is a key lookup in the bound request's form data.
pub struct TextWidget {
	field_name: String,
	required: bool,
	prefix: String,
	request: Arc<Request>,
	rendered: Option<Value>,
}

impl TextWidget {
	pub fn new(field: &dyn SchemaField, request: Arc<Request>) -> Self {
		Self {
			field_name: field.name().to_string(),
			required: field.required(),
			prefix: String::new(),
			request,
			rendered: None,
		}
	}
	fn input_name(&self) -> String {
		if self.prefix.is_empty() {
			self.field_name.clone()
		} else {
			format!("{}.{}", self.prefix, self.field_name)
		}
	}
	fn submitted(&self) -> Option<&Value> {
		self.request.form.get(&self.input_name())
	}
}

impl Widget for TextWidget {
	fn set_prefix(&mut self, prefix: &str) {
		self.prefix = prefix.to_string();
	}
	fn has_input(&self) -> bool {
		self.submitted().is_some()
	}
	fn input_value(&self) -> Result<Value, WidgetInputError> {
		let raw = self.submitted().cloned().unwrap_or(Value::Null);
		if self.required && value_text(&raw).is_empty() {
			return Err(WidgetInputError::new(
				self.field_name.clone(),
				"this field is required",
			));
		}
		Ok(raw)
	}
	fn set_rendered_value(&mut self, value: Value) {
		self.rendered = Some(value);
	}
	fn render(&self) -> String {
		let value = match &self.rendered {
			Some(value) => value.clone(),
			None => self.submitted().cloned().unwrap_or(Value::Null),
		};
		format!(
			r#"<input type="text" name="{}" value="{}" />"#,
			html_escape(&self.input_name()),
			html_escape(&value_text(&value))
		)
	}
}

/// Read-only widget rendering the current value in a span.
pub struct DisplayWidget {
	field_name: String,
	// Allow dead_code: display markup carries no input name, but the
	// prefix is kept so set_prefix stays observable in tests
	#[allow(dead_code)]
	prefix: String,
	rendered: Option<Value>,
}

impl DisplayWidget {
	pub fn new(field: &dyn SchemaField) -> Self {
		Self {
			field_name: field.name().to_string(),
			prefix: String::new(),
			rendered: None,
		}
	}
}

impl Widget for DisplayWidget {
	fn set_prefix(&mut self, prefix: &str) {
		self.prefix = prefix.to_string();
	}
	fn has_input(&self) -> bool {
		false
	}
	fn input_value(&self) -> Result<Value, WidgetInputError> {
		Err(WidgetInputError::new(
			self.field_name.clone(),
			"display widgets accept no input",
		))
	}
	fn set_rendered_value(&mut self, value: Value) {
		self.rendered = Some(value);
	}
	fn is_display(&self) -> bool {
		true
	}
	fn render(&self) -> String {
		let value = self.rendered.clone().unwrap_or(Value::Null);
		format!("<span>{}</span>", html_escape(&value_text(&value)))
	}
}

/// Registry with the text widgets registered for field kind `"text"`.
///
/// Required fields produce a widget that rejects empty submissions,
/// driving the aggregate-error path in
/// [`FieldColumn::input`](crate::FieldColumn::input).
pub fn registry() -> WidgetRegistry {
	let mut registry = WidgetRegistry::new();
	registry.register("text", WidgetMode::Input, |field, request| {
		Box::new(TextWidget::new(field, request))
	});
	registry.register("text", WidgetMode::Display, |field, _request| {
		Box::new(DisplayWidget::new(field))
	});
	registry
}
