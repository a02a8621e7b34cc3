// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{Diagnostic, DiagnosticColumn};

pub fn arity_mismatch(expected: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "ROW_001".to_string(),
		message: format!("row has {} values but its layout has {} columns", actual, expected),
		..Default::default()
	}
}

pub fn type_mismatch(column: &str, expected: &str, actual: &str) -> Diagnostic {
	Diagnostic {
		code: "ROW_002".to_string(),
		message: format!("value of type {} does not fit column `{}`", actual, column),
		column: Some(DiagnosticColumn {
			name: column.to_string(),
			ty: expected.to_string(),
		}),
		..Default::default()
	}
}
