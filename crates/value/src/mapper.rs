// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Mapping of engine column types and cells into host types and values.
//!
//! A column's host type is fixed once per cursor. Cells whose engine type
//! disagrees with it are coerced when a lossless or conventional reading
//! exists and become `Undefined` otherwise. Integer narrowing to `Int4` wraps
//! and real to `Int4` truncates and saturates; both are accepted losses.

use litedatum_engine::{Cell, ColumnInfo, EngineType};
use litedatum_type::{Blob, Type, Value};

pub fn host_type(ty: EngineType) -> Type {
	match ty {
		EngineType::Integer => Type::Int4,
		EngineType::Float => Type::Float8,
		EngineType::Text => Type::Utf8,
		EngineType::Blob => Type::Blob,
		EngineType::Null | EngineType::Unknown => Type::Undefined,
	}
}

pub fn declared_type(decl: &str) -> Option<EngineType> {
	EngineType::from_decl_type(decl)
}

/// Host type of a result column: its declared affinity, else the type seen
/// in the first row, else text.
pub fn column_type(column: &ColumnInfo, first: Option<&Cell>) -> Type {
	if let Some(declared) = column.decl_type.as_deref().and_then(declared_type) {
		return host_type(declared);
	}
	match first {
		Some(cell) if !cell.is_null() => host_type(cell.engine_type()),
		_ => Type::Utf8,
	}
}

pub fn convert(ty: Type, cell: Cell) -> Value {
	if cell.is_null() {
		return Value::Undefined;
	}

	match ty {
		Type::Int4 => to_int4(cell),
		Type::Float8 => to_float8(cell),
		Type::Utf8 => to_utf8(cell),
		Type::Blob => to_blob(cell),
		Type::Undefined => Value::Undefined,
	}
}

fn to_int4(cell: Cell) -> Value {
	match cell {
		Cell::Integer(i) => Value::Int4(i as i32),
		Cell::Real(f) => Value::Int4(f as i32),
		Cell::Text(bytes) => match parse_number(&bytes) {
			Some(Number::Integer(i)) => Value::Int4(i as i32),
			Some(Number::Real(f)) => Value::Int4(f as i32),
			None => Value::Undefined,
		},
		Cell::Null | Cell::Blob(_) => Value::Undefined,
	}
}

fn to_float8(cell: Cell) -> Value {
	match cell {
		Cell::Integer(i) => Value::Float8(i as f64),
		Cell::Real(f) => Value::Float8(f),
		Cell::Text(bytes) => match parse_number(&bytes) {
			Some(Number::Integer(i)) => Value::Float8(i as f64),
			Some(Number::Real(f)) => Value::Float8(f),
			None => Value::Undefined,
		},
		Cell::Null | Cell::Blob(_) => Value::Undefined,
	}
}

fn to_utf8(cell: Cell) -> Value {
	match cell {
		Cell::Integer(i) => Value::Utf8(i.to_string()),
		Cell::Real(f) => Value::Utf8(format!("{:?}", f)),
		Cell::Text(bytes) => Value::Utf8(String::from_utf8_lossy(&bytes).into_owned()),
		Cell::Blob(bytes) => String::from_utf8(bytes).map(Value::Utf8).unwrap_or(Value::Undefined),
		Cell::Null => Value::Undefined,
	}
}

fn to_blob(cell: Cell) -> Value {
	match cell {
		Cell::Blob(bytes) | Cell::Text(bytes) => Value::Blob(Blob::new(bytes)),
		Cell::Null | Cell::Integer(_) | Cell::Real(_) => Value::Undefined,
	}
}

enum Number {
	Integer(i64),
	Real(f64),
}

fn parse_number(bytes: &[u8]) -> Option<Number> {
	let text = std::str::from_utf8(bytes).ok()?.trim();
	if let Ok(i) = text.parse::<i64>() {
		return Some(Number::Integer(i));
	}
	text.parse::<f64>().ok().filter(|f| f.is_finite()).map(Number::Real)
}
