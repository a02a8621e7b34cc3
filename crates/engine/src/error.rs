// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use litedatum_type::error::diagnostic::{engine, flat, handle, statement};

use crate::SessionId;

/// Failures raised by an engine session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
	#[error("failed to open session: {0}")]
	Open(String),
	#[error("failed to load payload: {0}")]
	Load(String),
	#[error("failed to serialize session: {0}")]
	Serialize(String),
	#[error("failed to dump session: {0}")]
	Dump(String),
	#[error("{message}")]
	Statement {
		statement: String,
		message: String,
	},
	#[error("{message}")]
	Prepare {
		statement: String,
		message: String,
	},
	#[error("{message}")]
	Step {
		statement: String,
		message: String,
	},
	#[error("session {0} is closed")]
	Closed(SessionId),
	#[error("session {0} is busy")]
	Busy(SessionId),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

impl From<EngineError> for litedatum_type::Error {
	fn from(err: EngineError) -> Self {
		litedatum_type::error!(match err {
			EngineError::Open(reason) => engine::open_failed(reason),
			EngineError::Load(reason) => flat::engine_rejected(reason),
			EngineError::Serialize(reason) => engine::serialize_failed(reason),
			EngineError::Dump(reason) => engine::dump_failed(reason),
			EngineError::Statement {
				statement,
				message,
			} => statement::exec_failed(statement, message),
			EngineError::Prepare {
				statement,
				message,
			} => statement::prepare_failed(statement, message),
			EngineError::Step {
				statement,
				message,
			} => statement::step_failed(statement, message),
			EngineError::Closed(id) => handle::session_closed(id.0),
			EngineError::Busy(id) => handle::session_busy(id.0),
		})
	}
}

/// The engine's own message for a failure, without rusqlite's decoration.
pub(crate) fn engine_message(err: &rusqlite::Error) -> String {
	match err {
		rusqlite::Error::SqliteFailure(_, Some(message)) => message.clone(),
		other => other.to_string(),
	}
}
