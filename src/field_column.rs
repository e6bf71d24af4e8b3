//! Column binding a schema field to per-item input widgets
//!
//! `FieldColumn` carries the two-way binding between an item's field
//! value and a rendered widget: `input` parses the submitted batch,
//! `update` applies changed values, and `render_cell` shows either the
//! stored value or the raw submitted input depending on what happened
//! earlier in the request.

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::column::{Column, ColumnBase, IdFn};
use crate::error::{ColumnError, WidgetsError};
use crate::field::FormField;
use crate::formatter::Formatter;
use crate::widget::{Widget, WidgetMode};

/// Override closure replacing the default field read.
pub type GetFn = Arc<dyn Fn(&Value, &Formatter) -> Value + Send + Sync>;
/// Override closure replacing the default field write.
pub type SetFn = Arc<dyn Fn(&mut Value, Value, &Formatter) + Send + Sync>;
/// Override closure supplying a per-item field binding context.
pub type ContextFn = Arc<dyn Fn(&Value, &Formatter) -> Option<Value> + Send + Sync>;

// Annotation passing "some row changed" from update to render_cell
// within one request. Column-scoped by design: after any change the
// whole column re-renders from stored values.
const CHANGED: &str = "changed";

/// Column that supports field/widget update.
///
/// Instances are shared across concurrent requests and hold only the
/// field binding and its override closures — never per-request state.
/// Everything transient is parked on the [`Formatter`].
///
/// # Examples
///
/// ```
/// use grid_columns::{FieldColumn, Formatter, Request};
/// use grid_columns::testing::{TextField, registry};
/// use serde_json::json;
///
/// let column = FieldColumn::new(TextField::new("name", "Name"))
/// 	.with_id(|item, _| item["id"].as_str().unwrap_or_default().to_string());
///
/// let mut items = vec![json!({"id": "tom", "name": "Tom"})];
/// let request = Request::new().with_param("tom.name", json!("Thomas"));
/// let mut formatter = Formatter::new(request, registry());
///
/// let data = column.input(&items, &formatter).unwrap();
/// assert_eq!(data["tom"], json!("Thomas"));
/// assert!(column.update(&mut items, &data, &mut formatter));
/// assert_eq!(items[0]["name"], json!("Thomas"));
/// ```
pub struct FieldColumn {
	base: ColumnBase,
	form_field: FormField,
	get_fn: Option<GetFn>,
	set_fn: Option<SetFn>,
	context_fn: Option<ContextFn>,
}

impl FieldColumn {
	/// Bind `field` to a new column.
	///
	/// Accepts a raw schema field (auto-wrapped) or an already-built
	/// [`FormField`]; title and name default to the field's own.
	pub fn new(field: impl Into<FormField>) -> Self {
		let form_field = field.into();
		let title = form_field.field.title().to_string();
		let name = form_field.field.name().to_string();
		Self {
			base: ColumnBase::new(title, name, type_name::<FieldColumn>()),
			form_field,
			get_fn: None,
			set_fn: None,
			context_fn: None,
		}
	}
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.base.set_title(title);
		self
	}
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.base.set_name(name);
		self
	}
	/// Replace the default identifier derivation with a natural key.
	pub fn with_id<F>(mut self, id_fn: F) -> Self
	where
		F: Fn(&Value, &Formatter) -> String + Send + Sync + 'static,
	{
		self.base.set_id_fn(Arc::new(id_fn) as IdFn);
		self
	}
	/// Replace the default field read.
	pub fn with_getter<F>(mut self, get_fn: F) -> Self
	where
		F: Fn(&Value, &Formatter) -> Value + Send + Sync + 'static,
	{
		self.get_fn = Some(Arc::new(get_fn));
		self
	}
	/// Replace the default field write.
	pub fn with_setter<F>(mut self, set_fn: F) -> Self
	where
		F: Fn(&mut Value, Value, &Formatter) + Send + Sync + 'static,
	{
		self.set_fn = Some(Arc::new(set_fn));
		self
	}
	/// Supply a per-item binding context for fields whose validation
	/// depends on the row being edited.
	pub fn with_field_context<F>(mut self, context_fn: F) -> Self
	where
		F: Fn(&Value, &Formatter) -> Option<Value> + Send + Sync + 'static,
	{
		self.context_fn = Some(Arc::new(context_fn));
		self
	}

	/// Stable identifier for `item`, the key of this column's input
	/// mapping.
	pub fn item_id(&self, item: &Value, formatter: &Formatter) -> String {
		self.base.item_id(item, formatter)
	}

	/// Resolve a widget for this item.
	///
	/// Binds the field to the item context when one is supplied, picks
	/// display or input mode from the field's read-only state and the
	/// wrapper's display flag, and prefixes the widget's input name with
	/// the item prefix (plus the wrapper's sub-prefix when set). A
	/// missing registry entry propagates as [`ColumnError::NoWidget`].
	pub fn input_widget(
		&self,
		item: &Value,
		formatter: &Formatter,
	) -> Result<Box<dyn Widget>, ColumnError> {
		let form_field = &self.form_field;
		let field = match self.field_context(item, formatter) {
			Some(context) => form_field.field.bind(&context),
			None => Arc::clone(&form_field.field),
		};
		let mut widget = match &form_field.custom_widget {
			Some(factory) => factory(field.as_ref(), formatter.request_handle()),
			None => {
				let mode = if field.readonly() || form_field.for_display {
					WidgetMode::Display
				} else {
					WidgetMode::Input
				};
				formatter
					.widgets()
					.resolve(field.as_ref(), mode, formatter.request_handle())?
			}
		};
		let mut prefix = self.base.item_prefix(item, formatter);
		if let Some(sub) = &form_field.prefix {
			prefix = format!("{prefix}.{sub}");
		}
		widget.set_prefix(&prefix);
		Ok(widget)
	}

	/// Resolve the widget used for rendering.
	///
	/// When `ignore_request` is set, or the widget is display-only, or
	/// the request carries no input for it, the widget shows the current
	/// field value. Otherwise it is left reflecting the submitted,
	/// possibly invalid, input so users see what they typed.
	pub fn render_widget(
		&self,
		item: &Value,
		formatter: &Formatter,
		ignore_request: bool,
	) -> Result<Box<dyn Widget>, ColumnError> {
		let mut widget = self.input_widget(item, formatter)?;
		if ignore_request || widget.is_display() || !widget.has_input() {
			widget.set_rendered_value(self.get(item, formatter));
		}
		Ok(widget)
	}

	/// Current field value for `item`.
	pub fn get(&self, item: &Value, formatter: &Formatter) -> Value {
		match &self.get_fn {
			Some(get_fn) => get_fn(item, formatter),
			None => self.form_field.field.get(item),
		}
	}

	/// Write `value` onto `item`.
	pub fn set(&self, item: &mut Value, value: Value, formatter: &Formatter) {
		match &self.set_fn {
			Some(set_fn) => set_fn(item, value, formatter),
			None => self.form_field.field.set(item, value),
		}
	}

	/// Per-item binding context, `None` unless an override is installed.
	pub fn field_context(&self, item: &Value, formatter: &Formatter) -> Option<Value> {
		self.context_fn
			.as_ref()
			.and_then(|context_fn| context_fn(item, formatter))
	}

	/// Extract validated submitted values for the whole batch, keyed by
	/// item id.
	///
	/// Items whose widget reports no input are skipped. Per-item
	/// validation failures are collected and returned together as one
	/// aggregate error after the full batch has been processed, so the
	/// caller can report every bad row at once; no partial data is
	/// returned in that case.
	pub fn input(
		&self,
		items: &[Value],
		formatter: &Formatter,
	) -> Result<HashMap<String, Value>, ColumnError> {
		let mut data = HashMap::new();
		let mut errors = Vec::new();
		for item in items {
			let widget = self.input_widget(item, formatter)?;
			if widget.has_input() {
				match widget.input_value() {
					Ok(value) => {
						data.insert(self.item_id(item, formatter), value);
					}
					Err(error) => errors.push(error),
				}
			}
		}
		if !errors.is_empty() {
			debug!(
				column = self.base.name(),
				errors = errors.len(),
				"input batch failed validation"
			);
			return Err(WidgetsError(errors).into());
		}
		Ok(data)
	}

	/// Apply `data` (as returned by [`input`](Self::input)) onto the
	/// items.
	///
	/// An item absent from `data` is left untouched — absence means "no
	/// value supplied" and is distinct from every legitimate value,
	/// `Value::Null` included. A present value is written only when it
	/// differs from the current one. When anything changed, the
	/// column-scoped `changed` annotation is recorded so that
	/// [`render_cell`](Column::render_cell) re-renders from stored
	/// values for the rest of the request.
	pub fn update(
		&self,
		items: &mut [Value],
		data: &HashMap<String, Value>,
		formatter: &mut Formatter,
	) -> bool {
		let mut changed = false;
		for item in items.iter_mut() {
			let id = self.base.item_id(item, formatter);
			if let Some(value) = data.get(&id) {
				if self.get(item, formatter) != *value {
					self.set(item, value.clone(), formatter);
					changed = true;
				}
			}
		}
		if changed {
			debug!(column = self.base.name(), "column values updated");
			self.base
				.set_annotation(CHANGED, Value::Bool(true), formatter);
		}
		changed
	}
}

impl Column for FieldColumn {
	fn name(&self) -> &str {
		self.base.name()
	}
	fn title(&self) -> &str {
		self.base.title()
	}
	/// Render the widget for `item`.
	///
	/// After an [`update`](Self::update) that changed any row in this
	/// request, submitted input is ignored so the cell shows the freshly
	/// stored value rather than stale submitted text.
	fn render_cell(&self, item: &Value, formatter: &Formatter) -> Result<String, ColumnError> {
		let ignore_request = self
			.base
			.annotation(CHANGED, formatter)
			.and_then(Value::as_bool)
			.unwrap_or(false);
		let widget = self.render_widget(item, formatter, ignore_request)?;
		Ok(widget.render())
	}
}
