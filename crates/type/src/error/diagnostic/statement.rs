// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// Executing a script failed. The engine message is kept verbatim.
pub fn exec_failed(statement: impl Into<String>, message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STATEMENT_001".to_string(),
		statement: Some(statement.into()),
		message: message.into(),
		label: Some("statement failed here".to_string()),
		..Default::default()
	}
}

pub fn prepare_failed(statement: impl Into<String>, message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STATEMENT_002".to_string(),
		statement: Some(statement.into()),
		message: message.into(),
		label: Some("statement could not be prepared".to_string()),
		help: Some("check the statement syntax and that referenced tables exist".to_string()),
		..Default::default()
	}
}

pub fn step_failed(statement: impl Into<String>, message: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STATEMENT_003".to_string(),
		statement: Some(statement.into()),
		message: message.into(),
		label: Some("failed while producing rows".to_string()),
		..Default::default()
	}
}
