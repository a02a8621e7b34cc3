// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Host-side column types a query result can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	/// A 4-byte signed integer
	Int4,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text
	Utf8,
	/// Raw bytes
	Blob,
	/// No usable type; every value of this column is Undefined
	Undefined,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int4 | Type::Float8)
	}

	pub fn is_integer(&self) -> bool {
		matches!(self, Type::Int4)
	}

	pub fn is_floating_point(&self) -> bool {
		matches!(self, Type::Float8)
	}

	pub fn is_utf8(&self) -> bool {
		matches!(self, Type::Utf8)
	}

	pub fn is_blob(&self) -> bool {
		matches!(self, Type::Blob)
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Type::Undefined)
	}

	/// Size in bytes of a fixed-width value, `None` for variable length.
	pub fn size(&self) -> Option<usize> {
		match self {
			Type::Int4 => Some(4),
			Type::Float8 => Some(8),
			Type::Undefined => Some(0),
			Type::Utf8 | Type::Blob => None,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Int4 => f.write_str("Int4"),
			Type::Float8 => f.write_str("Float8"),
			Type::Utf8 => f.write_str("Utf8"),
			Type::Blob => f.write_str("Blob"),
			Type::Undefined => f.write_str("Undefined"),
		}
	}
}

pub trait GetType {
	fn get_type(&self) -> Type;
}

impl GetType for i32 {
	fn get_type(&self) -> Type {
		Type::Int4
	}
}

impl GetType for f64 {
	fn get_type(&self) -> Type {
		Type::Float8
	}
}

impl GetType for String {
	fn get_type(&self) -> Type {
		Type::Utf8
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_predicates() {
		assert!(Type::Int4.is_number());
		assert!(Type::Float8.is_number());
		assert!(!Type::Utf8.is_number());
		assert!(Type::Blob.is_blob());
		assert!(Type::Undefined.is_undefined());
	}

	#[test]
	fn test_size() {
		assert_eq!(Type::Int4.size(), Some(4));
		assert_eq!(Type::Float8.size(), Some(8));
		assert_eq!(Type::Utf8.size(), None);
	}
}
