// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod blob;
mod r#type;

pub use blob::Blob;
pub use r#type::{GetType, Type};

/// A host value as produced by a query cursor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (the engine returned NULL or the cell did not convert)
	Undefined,
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte floating point
	Float8(f64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// Raw bytes
	Blob(Blob),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		Value::Float8(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn blob(v: impl Into<Vec<u8>>) -> Self {
		Value::Blob(Blob::new(v.into()))
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn as_i32(&self) -> Option<i32> {
		match self {
			Value::Int4(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float8(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(v) => Some(v.as_str()),
			_ => None,
		}
	}

	pub fn as_blob(&self) -> Option<&Blob> {
		match self {
			Value::Blob(v) => Some(v),
			_ => None,
		}
	}
}

impl GetType for Value {
	fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Int4(_) => Type::Int4,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Blob(_) => Type::Blob,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("Undefined"),
			Value::Int4(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => Display::fmt(v, f),
			Value::Blob(v) => Display::fmt(v, f),
		}
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl From<Blob> for Value {
	fn from(v: Blob) -> Self {
		Value::Blob(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Undefined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_type() {
		assert_eq!(Value::Undefined.get_type(), Type::Undefined);
		assert_eq!(Value::int4(1).get_type(), Type::Int4);
		assert_eq!(Value::float8(1.5).get_type(), Type::Float8);
		assert_eq!(Value::utf8("a").get_type(), Type::Utf8);
		assert_eq!(Value::blob(vec![1u8]).get_type(), Type::Blob);
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::Undefined.to_string(), "Undefined");
		assert_eq!(Value::int4(-7).to_string(), "-7");
		assert_eq!(Value::float8(3.5).to_string(), "3.5");
		assert_eq!(Value::utf8("hi").to_string(), "hi");
		assert_eq!(Value::blob(vec![0xde, 0xad]).to_string(), "0xdead");
	}

	#[test]
	fn test_from_option() {
		assert_eq!(Value::from(None::<i32>), Value::Undefined);
		assert_eq!(Value::from(Some("x")), Value::utf8("x"));
	}

	#[test]
	fn test_accessors() {
		assert_eq!(Value::int4(42).as_i32(), Some(42));
		assert_eq!(Value::int4(42).as_f64(), None);
		assert_eq!(Value::utf8("hi").as_str(), Some("hi"));
		assert!(Value::Undefined.is_undefined());
	}
}
