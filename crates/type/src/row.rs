// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
	Result,
	error::diagnostic::row::{arity_mismatch, type_mismatch},
	return_error,
	value::{GetType, Type, Value},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
	pub name: String,
	pub ty: Type,
}

impl ColumnDescriptor {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// Ordered column descriptors shared by every row of one result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
	columns: Vec<ColumnDescriptor>,
}

impl RowLayout {
	pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
		Self {
			columns,
		}
	}

	pub fn columns(&self) -> &[ColumnDescriptor] {
		&self.columns
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn position(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.name == name)
	}
}

/// One result row. Values are positionally aligned with the layout and are
/// either Undefined or of their column's declared type.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
	layout: Arc<RowLayout>,
	values: Vec<Value>,
}

impl Row {
	pub fn new(layout: Arc<RowLayout>, values: Vec<Value>) -> Result<Self> {
		if values.len() != layout.len() {
			return_error!(arity_mismatch(layout.len(), values.len()));
		}

		for (column, value) in layout.columns().iter().zip(values.iter()) {
			if !value.is_undefined() && value.get_type() != column.ty {
				return_error!(type_mismatch(
					&column.name,
					&column.ty.to_string(),
					&value.get_type().to_string()
				));
			}
		}

		Ok(Self {
			layout,
			values,
		})
	}

	pub fn layout(&self) -> &Arc<RowLayout> {
		&self.layout
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	pub fn get_by_name(&self, name: &str) -> Option<&Value> {
		self.layout.position(name).and_then(|i| self.values.get(i))
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("{")?;
		for (i, (column, value)) in self.layout.columns().iter().zip(self.values.iter()).enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", column.name, value)?;
		}
		f.write_str("}")
	}
}
