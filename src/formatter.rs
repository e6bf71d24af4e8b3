//! Per-request rendering context
//!
//! A [`Formatter`] coordinates one render/update cycle for one incoming
//! request: it owns the submitted form data, the input-name prefix, the
//! widget registry handle, and the annotation store columns use to pass
//! transient state between calls. Column instances themselves are shared
//! across concurrent requests and hold no per-request state; everything
//! request-scoped lives here.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::widget::WidgetRegistry;

/// Submitted form data for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
	/// Submitted field names mapped to their raw values
	pub form: HashMap<String, Value>,
}

impl Request {
	pub fn new() -> Self {
		Self::default()
	}
	/// Build a request from already-parsed form data.
	pub fn from_form(form: HashMap<String, Value>) -> Self {
		Self { form }
	}
	/// Add one submitted field.
	///
	/// # Examples
	///
	/// ```
	/// use grid_columns::Request;
	/// use serde_json::json;
	///
	/// let request = Request::new().with_param("tom.name", json!("Tom"));
	/// assert!(request.form.contains_key("tom.name"));
	/// ```
	pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
		self.form.insert(name.into(), value);
		self
	}
}

/// Typed key for the formatter's annotation store.
///
/// Deterministic function of (defining column type, column name,
/// annotation name) — deliberately not of the item, so an annotation is
/// a per-column flag within one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
	scope: &'static str,
	column: String,
	name: &'static str,
}

impl AnnotationKey {
	pub fn new(scope: &'static str, column: impl Into<String>, name: &'static str) -> Self {
		Self {
			scope,
			column: column.into(),
			name,
		}
	}
}

/// Request-scoped coordinator passed through every column call.
///
/// # Examples
///
/// ```
/// use grid_columns::{Formatter, Request, WidgetRegistry};
///
/// let formatter = Formatter::new(Request::new(), WidgetRegistry::new())
/// 	.with_prefix("grid");
/// assert_eq!(formatter.prefix(), "grid");
/// ```
pub struct Formatter {
	request: Arc<Request>,
	prefix: String,
	widgets: Arc<WidgetRegistry>,
	annotations: HashMap<AnnotationKey, Value>,
}

impl Formatter {
	pub fn new(request: Request, widgets: impl Into<Arc<WidgetRegistry>>) -> Self {
		Self {
			request: Arc::new(request),
			prefix: String::new(),
			widgets: widgets.into(),
			annotations: HashMap::new(),
		}
	}
	/// Namespace every widget input name under `prefix`.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
	pub fn request(&self) -> &Request {
		&self.request
	}
	/// Shared handle to the request, for binding widgets.
	pub fn request_handle(&self) -> Arc<Request> {
		Arc::clone(&self.request)
	}
	pub fn prefix(&self) -> &str {
		&self.prefix
	}
	pub fn widgets(&self) -> &WidgetRegistry {
		&self.widgets
	}
	/// Store a transient per-request value under `key`.
	pub fn set_annotation(&mut self, key: AnnotationKey, value: Value) {
		self.annotations.insert(key, value);
	}
	/// Read a transient per-request value.
	pub fn annotation(&self, key: &AnnotationKey) -> Option<&Value> {
		self.annotations.get(key)
	}
}
