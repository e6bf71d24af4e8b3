//! Column rendering a per-row submit control
//!
//! Each cell carries an `<input type="submit">` whose name uniquely
//! identifies its row, so `input` can tell which row's button was
//! pressed. The header renders empty; action columns carry no label.

use std::any::type_name;
use std::sync::Arc;

use serde_json::Value;

use crate::column::{Column, ColumnBase, IdFn, html_escape};
use crate::error::ColumnError;
use crate::formatter::Formatter;

/// Override closure replacing the default (title) button label.
pub type LabelFn = Arc<dyn Fn(&Value, &Formatter) -> String + Send + Sync>;
/// Action applied to the batch when a row's submit was activated.
pub type ActionFn = Arc<dyn Fn(&mut [Value], &Value, &mut Formatter) + Send + Sync>;

/// Column that renders a named submit control per row and detects its
/// activation in submitted input.
///
/// # Examples
///
/// ```
/// use grid_columns::{Formatter, Request, SubmitColumn, WidgetRegistry};
/// use serde_json::json;
///
/// let column = SubmitColumn::new("Save", "save")
/// 	.with_id(|item, _| item["id"].as_str().unwrap_or_default().to_string());
///
/// let items = vec![json!({"id": "tom"}), json!({"id": "ana"})];
/// let request = Request::new().with_param("ana.save", json!(""));
/// let formatter = Formatter::new(request, WidgetRegistry::new());
///
/// let pressed = column.input(&items, &formatter).unwrap();
/// assert_eq!(pressed["id"], json!("ana"));
/// ```
pub struct SubmitColumn {
	base: ColumnBase,
	label_fn: Option<LabelFn>,
	action: Option<ActionFn>,
}

impl SubmitColumn {
	pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			base: ColumnBase::new(title, name, type_name::<SubmitColumn>()),
			label_fn: None,
			action: None,
		}
	}
	/// Replace the default identifier derivation with a natural key.
	pub fn with_id<F>(mut self, id_fn: F) -> Self
	where
		F: Fn(&Value, &Formatter) -> String + Send + Sync + 'static,
	{
		self.base.set_id_fn(Arc::new(id_fn) as IdFn);
		self
	}
	/// Label the button per row instead of with the column title.
	pub fn with_label<F>(mut self, label_fn: F) -> Self
	where
		F: Fn(&Value, &Formatter) -> String + Send + Sync + 'static,
	{
		self.label_fn = Some(Arc::new(label_fn));
		self
	}
	/// Define what happens when a row's submit is activated.
	///
	/// [`update`](Self::update) dispatches to this closure.
	pub fn with_action<F>(mut self, action: F) -> Self
	where
		F: Fn(&mut [Value], &Value, &mut Formatter) + Send + Sync + 'static,
	{
		self.action = Some(Arc::new(action));
		self
	}

	/// Name attribute of the row's control: item prefix plus column
	/// name.
	pub fn identifier(&self, item: &Value, formatter: &Formatter) -> String {
		format!(
			"{}.{}",
			self.base.item_prefix(item, formatter),
			self.base.name()
		)
	}

	/// Button label for `item`, the column title unless overridden.
	pub fn label(&self, item: &Value, formatter: &Formatter) -> String {
		match &self.label_fn {
			Some(label_fn) => label_fn(item, formatter),
			None => self.base.title().to_string(),
		}
	}

	/// Emit the submit control, every attribute value HTML-escaped.
	pub fn render_widget(
		&self,
		item: &Value,
		formatter: &Formatter,
		attrs: &[(&str, &str)],
	) -> String {
		let mut parts = vec![
			"input".to_string(),
			r#"type="submit""#.to_string(),
			format!(
				r#"name="{}""#,
				html_escape(&self.identifier(item, formatter))
			),
			format!(r#"value="{}""#, html_escape(&self.label(item, formatter))),
		];
		for (name, value) in attrs {
			parts.push(format!(r#"{}="{}""#, name, html_escape(value)));
		}
		format!("<{} />", parts.join(" "))
	}

	/// First item, in iteration order, whose identifier appears in the
	/// submitted form data — the row whose button was pressed. `None`
	/// when no identifier matched.
	pub fn input<'a>(&self, items: &'a [Value], formatter: &Formatter) -> Option<&'a Value> {
		items.iter().find(|item| {
			formatter
				.request()
				.form
				.contains_key(&self.identifier(item, formatter))
		})
	}

	/// Dispatch the activated row to the configured action.
	///
	/// # Panics
	///
	/// Panics when no action was installed with
	/// [`with_action`](Self::with_action); an action column without an
	/// action is a programming error.
	pub fn update(&self, items: &mut [Value], item: &Value, formatter: &mut Formatter) {
		match &self.action {
			Some(action) => action(items, item, formatter),
			None => panic!(
				"SubmitColumn `{}` has no action handler; install one with with_action",
				self.base.name()
			),
		}
	}
}

impl Column for SubmitColumn {
	fn name(&self) -> &str {
		self.base.name()
	}
	fn title(&self) -> &str {
		self.base.title()
	}
	// Action columns render no header label.
	fn render_header(&self, _formatter: &Formatter) -> String {
		String::new()
	}
	fn render_cell(&self, item: &Value, formatter: &Formatter) -> Result<String, ColumnError> {
		Ok(self.render_widget(item, formatter, &[]))
	}
}
