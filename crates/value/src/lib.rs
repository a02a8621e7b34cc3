// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Embedded SQLite databases as first-class host values.
//!
//! A value lives either as an immutable flat byte buffer, suitable for
//! storing and copying, or as a live in-memory session that can be queried
//! and modified. Conversion between the two happens on demand and the flat
//! form of an unmodified session is cached.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod codec;
pub mod cursor;
mod flat;
mod handle;
pub mod mapper;
mod scope;

pub use cursor::{PreparedQuery, QueryCursor, QuerySession};
pub use flat::{FlatBuffer, HEADER_SIZE};
pub use handle::{FlatRepr, HandleStats, ValueHandle, ValueInfo};
pub use litedatum_engine::{MAX_FLAT_SIZE, OpenFlags, SessionConfig, SessionId, TempStore};
pub use litedatum_type::{Error, ErrorKind, Result, Row, Type, Value};
pub use scope::Scope;

/// Creates an expanded value in `scope` from a script of SQL statements.
///
/// Nothing is produced when any statement fails; the half-built session is
/// closed before the error is returned.
pub fn create_from_script(scope: &Scope, script: &str) -> Result<ValueHandle> {
	ValueHandle::from_script(scope, script)
}

/// Wraps previously flattened bytes. Expansion happens on first use.
pub fn load_from_bytes(scope: &Scope, bytes: &[u8]) -> Result<ValueHandle> {
	ValueHandle::from_bytes(scope, bytes)
}

/// Imports a raw engine image, such as the contents of a database file.
pub fn import_image(scope: &Scope, image: &[u8]) -> Result<ValueHandle> {
	ValueHandle::from_image(scope, image)
}
