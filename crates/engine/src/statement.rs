// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Prepared statements and raw row stepping.

use tracing::instrument;

use crate::{Cell, EngineError, EngineResult, SessionGuard, SessionId, error::engine_message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
	pub name: String,
	pub decl_type: Option<String>,
}

pub struct Statement<'g> {
	sql: String,
	session: SessionId,
	inner: rusqlite::Statement<'g>,
}

impl<'s> SessionGuard<'s> {
	#[instrument(name = "session::prepare", level = "trace", skip(self, sql), fields(session = %self.session.id()))]
	pub fn prepare(&self, sql: &str) -> EngineResult<Statement<'_>> {
		let inner = self.connection()?.prepare(sql).map_err(|e| EngineError::Prepare {
			statement: sql.to_string(),
			message: engine_message(&e),
		})?;

		Ok(Statement {
			sql: sql.to_string(),
			session: self.session.id(),
			inner,
		})
	}
}

impl<'g> Statement<'g> {
	pub fn sql(&self) -> &str {
		&self.sql
	}

	pub fn session_id(&self) -> SessionId {
		self.session
	}

	/// True when the statement cannot modify the database.
	pub fn readonly(&self) -> bool {
		self.inner.readonly()
	}

	pub fn column_count(&self) -> usize {
		self.inner.column_count()
	}

	pub fn columns(&self) -> Vec<ColumnInfo> {
		self.inner
			.columns()
			.into_iter()
			.map(|c| ColumnInfo {
				name: c.name().to_string(),
				decl_type: c.decl_type().map(str::to_string),
			})
			.collect()
	}

	/// Starts stepping. Dropping the returned rows resets the statement.
	pub fn rows(&mut self) -> RawRows<'_> {
		let column_count = self.inner.column_count();
		RawRows {
			sql: &self.sql,
			column_count,
			rows: self.inner.raw_query(),
		}
	}

	pub fn finalize(self) -> EngineResult<()> {
		let sql = self.sql;
		self.inner.finalize().map_err(|e| EngineError::Step {
			statement: sql,
			message: engine_message(&e),
		})
	}
}

pub struct RawRows<'st> {
	sql: &'st str,
	column_count: usize,
	rows: rusqlite::Rows<'st>,
}

impl<'st> RawRows<'st> {
	/// Steps to the next row and copies its cells out.
	pub fn next_cells(&mut self) -> EngineResult<Option<Vec<Cell>>> {
		let sql = self.sql;
		let step_err = |e: rusqlite::Error| EngineError::Step {
			statement: sql.to_string(),
			message: engine_message(&e),
		};

		let Some(row) = self.rows.next().map_err(step_err)? else {
			return Ok(None);
		};

		let mut cells = Vec::with_capacity(self.column_count);
		for idx in 0..self.column_count {
			cells.push(Cell::from(row.get_ref(idx).map_err(step_err)?));
		}
		Ok(Some(cells))
	}
}
