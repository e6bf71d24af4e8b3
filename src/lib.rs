//! Column abstractions for tabular data-grid rendering
//!
//! Given a collection of items, each [`Column`] renders a header cell
//! and per-row cell content; editable columns additionally bind
//! submitted request input back onto model fields via widgets:
//!
//! - [`FieldColumn`] binds a schema field to a column and manages
//!   widget creation, batch input extraction with per-item error
//!   aggregation, value update, and display.
//! - [`SubmitColumn`] renders a named submit control per row and
//!   detects which row's control was activated.
//!
//! A table renderer drives the protocol per request: `input()` once
//! over the full item batch to parse submitted values, `update()` once
//! to apply changes, then `render_cell()` per item. All per-request
//! state lives on the [`Formatter`]; column instances are shared across
//! concurrent requests.
//!
//! The widget implementations, schema field types, and HTTP layer are
//! collaborators: this crate defines their interfaces ([`Widget`],
//! [`SchemaField`], [`Request`]) plus reference fixtures in
//! [`testing`].

pub mod column;
pub mod error;
pub mod field;
pub mod field_column;
pub mod formatter;
pub mod submit_column;
pub mod testing;
pub mod widget;

pub use column::{Column, ColumnBase, IdFn, html_escape, to_safe};
pub use error::{ColumnError, WidgetInputError, WidgetsError};
pub use field::{FormField, SchemaField};
pub use field_column::{ContextFn, FieldColumn, GetFn, SetFn};
pub use formatter::{AnnotationKey, Formatter, Request};
pub use submit_column::{ActionFn, LabelFn, SubmitColumn};
pub use widget::{Widget, WidgetFactory, WidgetMode, WidgetRegistry};
