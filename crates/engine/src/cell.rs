// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Engine-side column types and cell values.

use std::fmt::{Display, Formatter};

use rusqlite::types::ValueRef;

/// Storage class reported by the engine for a column or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineType {
	Integer,
	Float,
	Text,
	Blob,
	Null,
	Unknown,
}

impl EngineType {
	/// Maps SQLite's fundamental datatype codes.
	pub fn from_code(code: i32) -> Self {
		match code {
			1 => EngineType::Integer,
			2 => EngineType::Float,
			3 => EngineType::Text,
			4 => EngineType::Blob,
			5 => EngineType::Null,
			_ => EngineType::Unknown,
		}
	}

	pub fn code(&self) -> i32 {
		match self {
			EngineType::Integer => 1,
			EngineType::Float => 2,
			EngineType::Text => 3,
			EngineType::Blob => 4,
			EngineType::Null => 5,
			EngineType::Unknown => 0,
		}
	}

	/// Column affinity derived from a declared column type, following SQLite's
	/// rules. NUMERIC affinity and an empty declaration give `None`.
	pub fn from_decl_type(decl: &str) -> Option<Self> {
		let decl = decl.to_ascii_uppercase();
		if decl.contains("INT") {
			Some(EngineType::Integer)
		} else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
			Some(EngineType::Text)
		} else if decl.contains("BLOB") {
			Some(EngineType::Blob)
		} else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") {
			Some(EngineType::Float)
		} else {
			None
		}
	}
}

impl Display for EngineType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			EngineType::Integer => f.write_str("INTEGER"),
			EngineType::Float => f.write_str("FLOAT"),
			EngineType::Text => f.write_str("TEXT"),
			EngineType::Blob => f.write_str("BLOB"),
			EngineType::Null => f.write_str("NULL"),
			EngineType::Unknown => f.write_str("UNKNOWN"),
		}
	}
}

/// An owned copy of one result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
	Null,
	Integer(i64),
	Real(f64),
	/// Text as stored; not guaranteed to be valid UTF-8
	Text(Vec<u8>),
	Blob(Vec<u8>),
}

impl Cell {
	pub fn engine_type(&self) -> EngineType {
		match self {
			Cell::Null => EngineType::Null,
			Cell::Integer(_) => EngineType::Integer,
			Cell::Real(_) => EngineType::Float,
			Cell::Text(_) => EngineType::Text,
			Cell::Blob(_) => EngineType::Blob,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Cell::Null)
	}
}

impl From<ValueRef<'_>> for Cell {
	fn from(value: ValueRef<'_>) -> Self {
		match value {
			ValueRef::Null => Cell::Null,
			ValueRef::Integer(i) => Cell::Integer(i),
			ValueRef::Real(f) => Cell::Real(f),
			ValueRef::Text(t) => Cell::Text(t.to_vec()),
			ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
		}
	}
}
