// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// The engine refused to create a fresh in-memory session
pub fn open_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "OPEN_001".to_string(),
		message: format!("failed to open engine session: {}", reason.into()),
		help: Some("the engine could not allocate an in-memory database; check available memory".to_string()),
		..Default::default()
	}
}

/// The engine failed to produce its serialized image
pub fn serialize_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SERIALIZE_001".to_string(),
		message: format!("failed to serialize engine session: {}", reason.into()),
		..Default::default()
	}
}

/// The flat form would exceed the configured maximum size
pub fn flat_too_large(size: usize, max: usize) -> Diagnostic {
	Diagnostic {
		code: "SERIALIZE_002".to_string(),
		message: format!("flat value of {} bytes exceeds the maximum of {} bytes", size, max),
		help: Some("reduce the amount of data held in the value or raise max_flat_size".to_string()),
		..Default::default()
	}
}

/// Walking the schema or table contents for a text dump failed
pub fn dump_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DUMP_001".to_string(),
		message: format!("failed to dump engine session: {}", reason.into()),
		..Default::default()
	}
}
