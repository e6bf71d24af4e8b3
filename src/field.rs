//! Schema field interface and the form-field wrapper bound to columns
//!
//! A [`SchemaField`] reads and writes one attribute of an opaque row item.
//! [`FormField`] pairs a schema field with form-processing options: an
//! optional custom widget factory, a display-only flag, and an optional
//! extra name prefix.

use std::sync::Arc;

use serde_json::Value;

use crate::widget::WidgetFactory;

/// One attribute of a row item, addressable by name.
///
/// Implementations are shared across requests and must hold no
/// per-request state.
pub trait SchemaField: Send + Sync {
	/// Attribute name, used as the trailing segment of widget input names
	fn name(&self) -> &str;

	/// Human-readable label, the default column title
	fn title(&self) -> &str;

	/// Registry key selecting which widget factory handles this field
	fn kind(&self) -> &str;

	/// Read-only fields always render with a display widget
	fn readonly(&self) -> bool {
		false
	}

	/// Required fields reject empty submissions
	fn required(&self) -> bool {
		false
	}

	/// Read this field's value from an item.
	fn get(&self, item: &Value) -> Value;

	/// Write a value onto an item.
	fn set(&self, item: &mut Value, value: Value);

	/// Return a copy of this field bound to a per-item context.
	///
	/// Fields whose validation or choices depend on the row being edited
	/// use the context; fields that need no per-row binding return a
	/// clone of themselves.
	fn bind(&self, context: &Value) -> Arc<dyn SchemaField>;
}

/// A schema field wrapped with form-processing options.
///
/// # Examples
///
/// ```
/// use grid_columns::FormField;
/// use grid_columns::testing::TextField;
///
/// let form_field = FormField::new(TextField::new("name", "Name"))
/// 	.for_display()
/// 	.with_prefix("extra");
/// assert!(form_field.for_display);
/// assert_eq!(form_field.prefix.as_deref(), Some("extra"));
/// ```
#[derive(Clone)]
pub struct FormField {
	/// The wrapped schema field
	pub field: Arc<dyn SchemaField>,
	/// Factory used instead of the registry lookup when set
	pub custom_widget: Option<WidgetFactory>,
	/// Force a display widget even for writable fields
	pub for_display: bool,
	/// Extra prefix segment inserted between the item prefix and the
	/// field name
	pub prefix: Option<String>,
}

impl FormField {
	pub fn new(field: impl Into<FormField>) -> Self {
		field.into()
	}
	/// Use `factory` instead of the formatter's widget registry.
	pub fn with_custom_widget(mut self, factory: WidgetFactory) -> Self {
		self.custom_widget = Some(factory);
		self
	}
	/// Render with a display widget regardless of field writability.
	pub fn for_display(mut self) -> Self {
		self.for_display = true;
		self
	}
	/// Insert an extra segment into widget input-name prefixes.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}
}

impl From<Arc<dyn SchemaField>> for FormField {
	fn from(field: Arc<dyn SchemaField>) -> Self {
		Self {
			field,
			custom_widget: None,
			for_display: false,
			prefix: None,
		}
	}
}

impl<F: SchemaField + 'static> From<F> for FormField {
	fn from(field: F) -> Self {
		FormField::from(Arc::new(field) as Arc<dyn SchemaField>)
	}
}
