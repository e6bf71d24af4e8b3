//! Error types for column input and widget resolution

use crate::widget::WidgetMode;

/// A single widget's validation failure during input extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input for `{field}`: {message}")]
pub struct WidgetInputError {
	/// Name of the schema field whose submitted value was rejected
	pub field: String,
	/// Human-readable description of the failure
	pub message: String,
}

impl WidgetInputError {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Aggregate of every per-item validation failure collected over one
/// input batch.
///
/// [`FieldColumn::input`](crate::FieldColumn::input) processes the full
/// item batch before failing, so callers receive all row errors in one
/// pass instead of only the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} widget input error(s)", .0.len())]
pub struct WidgetsError(pub Vec<WidgetInputError>);

#[derive(Debug, thiserror::Error)]
pub enum ColumnError {
	/// No factory registered for the field kind / widget mode pair.
	#[error("no {mode:?} widget registered for field kind `{kind}`")]
	NoWidget { kind: String, mode: WidgetMode },
	/// One or more submitted values failed widget validation.
	#[error(transparent)]
	Widgets(#[from] WidgetsError),
}
