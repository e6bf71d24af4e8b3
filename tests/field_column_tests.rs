//! FieldColumn batch input, update, and render protocol tests

use std::sync::Arc;

use grid_columns::testing::{TextField, TextWidget, registry};
use grid_columns::{
	Column, ColumnError, FieldColumn, FormField, Formatter, Request, WidgetRegistry,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn item_key(item: &Value, _formatter: &Formatter) -> String {
	item["id"].as_str().unwrap_or_default().to_string()
}

fn name_column() -> FieldColumn {
	FieldColumn::new(TextField::new("name", "Name")).with_id(item_key)
}

#[fixture]
fn items() -> Vec<Value> {
	vec![
		json!({"id": "tom", "name": "Tom"}),
		json!({"id": "ana", "name": "Ana"}),
	]
}

#[rstest]
fn title_and_name_default_to_the_field() {
	let column = name_column();
	assert_eq!(column.title(), "Name");
	assert_eq!(column.name(), "name");

	let renamed = name_column().with_title("Full name").with_name("full");
	assert_eq!(renamed.title(), "Full name");
	assert_eq!(renamed.name(), "full");
}

#[rstest]
fn header_is_escaped_title() {
	let column = name_column().with_title("A & B");
	let formatter = Formatter::new(Request::new(), registry());
	assert_eq!(column.render_header(&formatter), "A &amp; B");
}

#[rstest]
fn input_collects_submitted_values_keyed_by_item_id(items: Vec<Value>) {
	let column = name_column();
	let request = Request::new().with_param("tom.name", json!("Thomas"));
	let formatter = Formatter::new(request, registry());

	let data = column.input(&items, &formatter).unwrap();
	assert_eq!(data.len(), 1);
	assert_eq!(data["tom"], json!("Thomas"));
}

#[rstest]
fn input_aggregates_failures_after_the_full_batch(items: Vec<Value>) {
	let column = FieldColumn::new(TextField::new("name", "Name").required()).with_id(item_key);
	let request = Request::new()
		.with_param("tom.name", json!(""))
		.with_param("ana.name", json!("Anna"));
	let formatter = Formatter::new(request, registry());

	let error = column.input(&items, &formatter).unwrap_err();
	match error {
		ColumnError::Widgets(widgets) => {
			assert_eq!(widgets.0.len(), 1);
			assert_eq!(widgets.0[0].field, "name");
		}
		other => panic!("expected aggregate widgets error, got {other:?}"),
	}
	// Ana's valid value was discarded along with the batch; the items
	// themselves are untouched until update() is called.
	assert_eq!(items[1]["name"], json!("Ana"));
}

#[rstest]
fn every_failing_row_lands_in_the_one_aggregate_error(items: Vec<Value>) {
	let column = FieldColumn::new(TextField::new("name", "Name").required()).with_id(item_key);
	let request = Request::new()
		.with_param("tom.name", json!(""))
		.with_param("ana.name", json!(""));
	let formatter = Formatter::new(request, registry());

	let error = column.input(&items, &formatter).unwrap_err();
	match error {
		ColumnError::Widgets(widgets) => {
			assert_eq!(widgets.0.len(), 2);
			assert!(widgets.0.iter().all(|failure| failure.field == "name"));
		}
		other => panic!("expected aggregate widgets error, got {other:?}"),
	}
}

#[rstest]
fn update_with_empty_data_changes_nothing(mut items: Vec<Value>) {
	let column = name_column();
	let mut formatter = Formatter::new(Request::new(), registry());

	let changed = column.update(&mut items, &Default::default(), &mut formatter);
	assert!(!changed);
	assert_eq!(items[0]["name"], json!("Tom"));
	assert_eq!(items[1]["name"], json!("Ana"));
}

#[rstest]
fn update_touches_only_items_present_with_differing_values(mut items: Vec<Value>) {
	let column = name_column();
	let mut formatter = Formatter::new(Request::new(), registry());
	let data = [("tom".to_string(), json!("Thomas"))].into_iter().collect();

	assert!(column.update(&mut items, &data, &mut formatter));
	assert_eq!(items[0]["name"], json!("Thomas"));
	assert_eq!(items[1]["name"], json!("Ana"));

	// A second pass with the same data finds nothing left to change.
	assert!(!column.update(&mut items, &data, &mut formatter));
}

#[rstest]
fn update_distinguishes_null_from_absent(mut items: Vec<Value>) {
	let column = name_column();
	let mut formatter = Formatter::new(Request::new(), registry());
	let data = [("tom".to_string(), Value::Null)].into_iter().collect();

	assert!(column.update(&mut items, &data, &mut formatter));
	assert_eq!(items[0]["name"], Value::Null);
	assert_eq!(items[1]["name"], json!("Ana"));
}

#[rstest]
fn render_echoes_submitted_input_before_any_update(items: Vec<Value>) {
	let column = name_column();
	let request = Request::new().with_param("tom.name", json!("Ty"));
	let formatter = Formatter::new(request, registry());

	let cell = column.render_cell(&items[0], &formatter).unwrap();
	assert!(cell.contains(r#"value="Ty""#), "cell was: {cell}");
}

#[rstest]
fn render_after_a_changing_update_shows_the_stored_value(mut items: Vec<Value>) {
	let column = name_column();
	let request = Request::new().with_param("tom.name", json!("  Thomas  "));
	let mut formatter = Formatter::new(request, registry());

	// The caller normalized the submitted value before applying it.
	let data = [("tom".to_string(), json!("Thomas"))].into_iter().collect();
	assert!(column.update(&mut items, &data, &mut formatter));

	let cell = column.render_cell(&items[0], &formatter).unwrap();
	assert!(cell.contains(r#"value="Thomas""#), "cell was: {cell}");
	assert!(!cell.contains("  Thomas  "), "cell was: {cell}");
}

#[rstest]
fn rows_without_input_render_the_current_value(items: Vec<Value>) {
	let column = name_column();
	let formatter = Formatter::new(Request::new(), registry());

	let cell = column.render_cell(&items[1], &formatter).unwrap();
	assert!(cell.contains(r#"name="ana.name""#), "cell was: {cell}");
	assert!(cell.contains(r#"value="Ana""#), "cell was: {cell}");
}

#[rstest]
fn display_flag_and_readonly_fields_use_the_display_widget(items: Vec<Value>) {
	let formatter = Formatter::new(Request::new(), registry());

	let display = FieldColumn::new(FormField::new(TextField::new("name", "Name")).for_display())
		.with_id(item_key);
	assert_eq!(
		display.render_cell(&items[0], &formatter).unwrap(),
		"<span>Tom</span>"
	);

	let readonly =
		FieldColumn::new(TextField::new("name", "Name").readonly()).with_id(item_key);
	assert_eq!(
		readonly.render_cell(&items[0], &formatter).unwrap(),
		"<span>Tom</span>"
	);
}

#[rstest]
fn display_widgets_never_report_input(items: Vec<Value>) {
	let column = FieldColumn::new(FormField::new(TextField::new("name", "Name")).for_display())
		.with_id(item_key);
	let request = Request::new().with_param("tom.name", json!("Thomas"));
	let formatter = Formatter::new(request, registry());

	let data = column.input(&items, &formatter).unwrap();
	assert!(data.is_empty());
}

#[rstest]
fn missing_widget_registration_propagates(items: Vec<Value>) {
	let column = name_column();
	let formatter = Formatter::new(Request::new(), WidgetRegistry::new());

	let error = match column.input_widget(&items[0], &formatter) {
		Err(error) => error,
		Ok(_) => panic!("expected the widget lookup to fail"),
	};
	assert!(matches!(error, ColumnError::NoWidget { .. }), "{error:?}");
}

#[rstest]
fn custom_widget_factory_bypasses_the_registry(items: Vec<Value>) {
	let form_field = FormField::new(TextField::new("name", "Name")).with_custom_widget(
		Arc::new(|field, request| Box::new(TextWidget::new(field, request))),
	);
	let column = FieldColumn::new(form_field).with_id(item_key);
	// Empty registry: only the custom factory can produce the widget.
	let request = Request::new().with_param("tom.name", json!("Thomas"));
	let formatter = Formatter::new(request, WidgetRegistry::new());

	let data = column.input(&items, &formatter).unwrap();
	assert_eq!(data["tom"], json!("Thomas"));
}

#[rstest]
fn prefixes_compose_formatter_item_and_field_segments(items: Vec<Value>) {
	let form_field = FormField::new(TextField::new("name", "Name")).with_prefix("cell");
	let column = FieldColumn::new(form_field).with_id(item_key);
	let request = Request::new().with_param("grid.tom.cell.name", json!("Thomas"));
	let formatter = Formatter::new(request, registry()).with_prefix("grid");

	let data = column.input(&items, &formatter).unwrap();
	assert_eq!(data["tom"], json!("Thomas"));

	let cell = column.render_cell(&items[1], &formatter).unwrap();
	assert!(cell.contains(r#"name="grid.ana.cell.name""#), "cell was: {cell}");
}

#[rstest]
fn getter_and_setter_overrides_replace_field_access(mut items: Vec<Value>) {
	let column = name_column()
		.with_getter(|item, _| item["nick"].clone())
		.with_setter(|item, value, _| {
			item["nick"] = value;
		});
	let mut formatter = Formatter::new(Request::new(), registry());
	let data = [("tom".to_string(), json!("Tommy"))].into_iter().collect();

	assert!(column.update(&mut items, &data, &mut formatter));
	assert_eq!(items[0]["nick"], json!("Tommy"));
	// The field itself was left alone.
	assert_eq!(items[0]["name"], json!("Tom"));
}

#[rstest]
fn context_bound_fields_still_parse_input(items: Vec<Value>) {
	let column = name_column().with_field_context(|item, _| Some(json!({"row": item["id"]})));
	let request = Request::new().with_param("tom.name", json!("Thomas"));
	let formatter = Formatter::new(request, registry());

	let data = column.input(&items, &formatter).unwrap();
	assert_eq!(data["tom"], json!("Thomas"));
}

#[rstest]
fn default_item_id_uses_the_safe_encoding() {
	let column = FieldColumn::new(TextField::new("name", "Name"));
	let formatter = Formatter::new(Request::new(), registry());

	assert_eq!(column.item_id(&json!("tom"), &formatter), "tom");
	assert_eq!(column.item_id(&json!("a=b"), &formatter), "YT1i");
}
