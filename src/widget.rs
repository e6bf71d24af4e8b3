//! Widget interface and the explicit widget registry
//!
//! Widgets convert between raw submitted form input and typed values,
//! and render display markup. Every widget is created fresh per call
//! and bound to a single field and request; no caching or pooling.
//!
//! Resolution is an explicit lookup on a (field kind, [`WidgetMode`])
//! pair rather than open-ended dynamic dispatch: applications register
//! a factory per pair, and a missing entry surfaces as
//! [`ColumnError::NoWidget`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{ColumnError, WidgetInputError};
use crate::field::SchemaField;
use crate::formatter::Request;

/// Which side of the input/display split a widget serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetMode {
	/// Accepts and validates submitted input
	Input,
	/// Renders the current value read-only
	Display,
}

/// A field- and request-bound object converting between submitted
/// input and typed values, and rendering markup.
pub trait Widget {
	/// Set the input-name prefix. The full input name is the prefix
	/// joined with the field name.
	fn set_prefix(&mut self, prefix: &str);

	/// Whether the bound request carries input for this widget.
	fn has_input(&self) -> bool;

	/// Extract and validate the submitted value.
	fn input_value(&self) -> Result<Value, WidgetInputError>;

	/// Override the value shown when rendering, replacing any submitted
	/// input.
	fn set_rendered_value(&mut self, value: Value);

	/// Display widgets never consult submitted input when rendering.
	fn is_display(&self) -> bool {
		false
	}

	/// Render the widget to markup.
	fn render(&self) -> String;
}

/// Constructs a widget for one field bound to one request.
pub type WidgetFactory =
	Arc<dyn Fn(&dyn SchemaField, Arc<Request>) -> Box<dyn Widget> + Send + Sync>;

/// Explicit map from (field kind, mode) to a widget factory.
///
/// # Examples
///
/// ```
/// use grid_columns::{WidgetMode, WidgetRegistry};
/// use grid_columns::testing::TextWidget;
///
/// let mut registry = WidgetRegistry::new();
/// registry.register("text", WidgetMode::Input, |field, request| {
/// 	Box::new(TextWidget::new(field, request))
/// });
/// assert!(registry.contains("text", WidgetMode::Input));
/// assert!(!registry.contains("text", WidgetMode::Display));
/// ```
#[derive(Default)]
pub struct WidgetRegistry {
	factories: HashMap<(String, WidgetMode), WidgetFactory>,
}

impl WidgetRegistry {
	pub fn new() -> Self {
		Self::default()
	}
	/// Register `factory` for every field of `kind` in `mode`.
	///
	/// A later registration for the same pair replaces the earlier one.
	pub fn register<F>(&mut self, kind: impl Into<String>, mode: WidgetMode, factory: F)
	where
		F: Fn(&dyn SchemaField, Arc<Request>) -> Box<dyn Widget> + Send + Sync + 'static,
	{
		self.factories.insert((kind.into(), mode), Arc::new(factory));
	}
	/// Whether a factory is registered for the pair.
	pub fn contains(&self, kind: &str, mode: WidgetMode) -> bool {
		self.factories.contains_key(&(kind.to_string(), mode))
	}
	/// Build a widget for `field` bound to `request`.
	///
	/// Fails with [`ColumnError::NoWidget`] when no factory is
	/// registered for the field's kind in `mode`.
	pub fn resolve(
		&self,
		field: &dyn SchemaField,
		mode: WidgetMode,
		request: Arc<Request>,
	) -> Result<Box<dyn Widget>, ColumnError> {
		let factory = self
			.factories
			.get(&(field.kind().to_string(), mode))
			.ok_or_else(|| ColumnError::NoWidget {
				kind: field.kind().to_string(),
				mode,
			})?;
		trace!(kind = field.kind(), ?mode, "resolved widget factory");
		Ok(factory(field, request))
	}
}
