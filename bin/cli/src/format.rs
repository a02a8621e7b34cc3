// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::io::Write;

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use litedatum_type::{Row, RowLayout, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::CliResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
	Table,
	Json,
}

pub fn write_rows<W: Write>(out: &mut W, layout: Option<&RowLayout>, rows: &[Row], format: OutputFormat) -> CliResult<()> {
	match format {
		OutputFormat::Table => write_table(out, layout, rows),
		OutputFormat::Json => {
			let rows: Vec<JsonValue> = rows.iter().map(row_to_json).collect();
			serde_json::to_writer_pretty(&mut *out, &rows)?;
			writeln!(out)?;
			Ok(())
		}
	}
}

fn write_table<W: Write>(out: &mut W, layout: Option<&RowLayout>, rows: &[Row]) -> CliResult<()> {
	let Some(layout) = layout else {
		return Ok(());
	};

	let mut table = Table::new();
	table.load_preset(UTF8_FULL_CONDENSED).set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(layout.columns().iter().map(|c| Cell::new(&c.name)));
	for row in rows {
		table.add_row(row.values().iter().map(|v| Cell::new(cell_text(v))));
	}

	writeln!(out, "{table}")?;
	writeln!(out, "({} row{})", rows.len(), if rows.len() == 1 { "" } else { "s" })?;
	Ok(())
}

fn cell_text(value: &Value) -> String {
	match value {
		Value::Undefined => "NULL".to_string(),
		other => other.to_string(),
	}
}

pub fn row_to_json(row: &Row) -> JsonValue {
	let mut object = Map::new();
	for (column, value) in row.layout().columns().iter().zip(row.values()) {
		object.insert(column.name.clone(), value_to_json(value));
	}
	JsonValue::Object(object)
}

pub fn value_to_json(value: &Value) -> JsonValue {
	match value {
		Value::Undefined => JsonValue::Null,
		Value::Int4(v) => JsonValue::from(*v),
		Value::Float8(v) => Number::from_f64(*v).map(JsonValue::Number).unwrap_or(JsonValue::Null),
		Value::Utf8(v) => JsonValue::String(v.clone()),
		Value::Blob(v) => JsonValue::String(v.to_hex()),
	}
}
