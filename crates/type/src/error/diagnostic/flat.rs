// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn buffer_too_short(len: usize) -> Diagnostic {
	Diagnostic {
		code: "LOAD_001".to_string(),
		message: format!("flat buffer of {} bytes is shorter than its header", len),
		..Default::default()
	}
}

pub fn length_mismatch(declared: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "LOAD_002".to_string(),
		message: format!("flat buffer declares {} bytes but holds {}", declared, actual),
		help: Some("the buffer was truncated or is not a flat value".to_string()),
		..Default::default()
	}
}

pub fn payload_too_large(size: usize, max: usize) -> Diagnostic {
	Diagnostic {
		code: "LOAD_003".to_string(),
		message: format!("flat buffer of {} bytes exceeds the maximum of {} bytes", size, max),
		..Default::default()
	}
}

/// The engine refused the payload, or the loaded image failed validation
pub fn engine_rejected(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "LOAD_004".to_string(),
		message: format!("engine rejected flat payload: {}", reason.into()),
		help: Some("the payload is not a valid engine image".to_string()),
		..Default::default()
	}
}
