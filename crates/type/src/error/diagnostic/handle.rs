// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn session_closed(session: u64) -> Diagnostic {
	Diagnostic {
		code: "HANDLE_001".to_string(),
		message: format!("engine session {} is closed", session),
		help: Some("the scope owning this value was released; the handle can no longer be used".to_string()),
		..Default::default()
	}
}

pub fn scope_released(scope: &str) -> Diagnostic {
	Diagnostic {
		code: "HANDLE_002".to_string(),
		message: format!("scope '{}' is already released", scope),
		..Default::default()
	}
}

pub fn flat_size_mismatch(expected: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "HANDLE_003".to_string(),
		message: format!("flat output buffer has {} bytes, expected {}", actual, expected),
		help: Some("size the buffer with flat_size() before calling flatten_into()".to_string()),
		..Default::default()
	}
}

pub fn session_busy(session: u64) -> Diagnostic {
	Diagnostic {
		code: "HANDLE_004".to_string(),
		message: format!("engine session {} is busy with an open cursor", session),
		help: Some("drop or finish the cursor before using the value again".to_string()),
		..Default::default()
	}
}
