// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;
mod r#macro;

use diagnostic::{Diagnostic, render::DefaultRenderer};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	/// Classifies the error by the family of its diagnostic code.
	pub fn kind(&self) -> ErrorKind {
		ErrorKind::from_code(&self.0.code)
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(Box::new(diagnostic))
	}
}

/// Failure classes surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The engine session could not be initialised.
	EngineOpen,
	/// A flat payload was malformed or rejected by the engine.
	EngineLoad,
	/// The engine failed to produce flat bytes or a text dump.
	EngineSerialize,
	/// A user supplied statement failed.
	Statement,
	/// The handle is unusable: closed session, released scope or busy session.
	Handle,
	/// A violated internal invariant.
	Internal,
}

impl ErrorKind {
	pub fn from_code(code: &str) -> Self {
		let family = code.split('_').next().unwrap_or(code);
		match family {
			"OPEN" => ErrorKind::EngineOpen,
			"LOAD" => ErrorKind::EngineLoad,
			"SERIALIZE" | "DUMP" => ErrorKind::EngineSerialize,
			"STATEMENT" => ErrorKind::Statement,
			"HANDLE" => ErrorKind::Handle,
			_ => ErrorKind::Internal,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::diagnostic::{engine, flat, handle, statement};

	#[test]
	fn test_kind_from_code_family() {
		assert_eq!(ErrorKind::from_code("OPEN_001"), ErrorKind::EngineOpen);
		assert_eq!(ErrorKind::from_code("LOAD_003"), ErrorKind::EngineLoad);
		assert_eq!(ErrorKind::from_code("SERIALIZE_002"), ErrorKind::EngineSerialize);
		assert_eq!(ErrorKind::from_code("DUMP_001"), ErrorKind::EngineSerialize);
		assert_eq!(ErrorKind::from_code("STATEMENT_001"), ErrorKind::Statement);
		assert_eq!(ErrorKind::from_code("HANDLE_001"), ErrorKind::Handle);
		assert_eq!(ErrorKind::from_code("INTERNAL_ERROR"), ErrorKind::Internal);
		assert_eq!(ErrorKind::from_code("whatever"), ErrorKind::Internal);
	}

	#[test]
	fn test_error_kinds_of_constructors() {
		assert_eq!(Error::from(engine::open_failed("no memory")).kind(), ErrorKind::EngineOpen);
		assert_eq!(Error::from(flat::length_mismatch(16, 12)).kind(), ErrorKind::EngineLoad);
		assert_eq!(Error::from(engine::serialize_failed("out of memory")).kind(), ErrorKind::EngineSerialize);
		assert_eq!(
			Error::from(statement::exec_failed("SELECT x", "no such column: x")).kind(),
			ErrorKind::Statement
		);
		assert_eq!(Error::from(handle::session_closed(3)).kind(), ErrorKind::Handle);
		assert_eq!(Error::from(crate::internal_error!("broken")).kind(), ErrorKind::Internal);
	}

	#[test]
	fn test_display_renders_diagnostic() {
		let err = crate::error!(statement::exec_failed("DROP TABLE nope", "no such table: nope"));
		let rendered = err.to_string();
		assert!(rendered.starts_with("error[STATEMENT_001]:"));
		assert!(rendered.contains("no such table: nope"));
		assert!(rendered.contains("DROP TABLE nope"));
	}

	#[test]
	fn test_deref_exposes_diagnostic() {
		let err = crate::error!(handle::scope_released("txn"));
		assert_eq!(err.code, "HANDLE_002");
		assert_eq!(err.diagnostic().code, "HANDLE_002");
	}
}
