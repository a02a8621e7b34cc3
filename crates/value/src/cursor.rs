// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Streaming query results as host rows.
//!
//! A cursor is obtained in three steps so that every borrow of the engine
//! connection is visible to the compiler:
//!
//! ```ignore
//! let session = handle.session()?;
//! let mut prepared = session.prepare("SELECT * FROM t")?;
//! for row in prepared.rows() {
//!     let row = row?;
//! }
//! prepared.finalize()?;
//! ```

use std::{cell::Cell as Flag, iter::FusedIterator, sync::Arc};

use litedatum_engine::{Cell, ColumnInfo, RawRows, SessionGuard, SessionId, Statement};
use litedatum_type::{ColumnDescriptor, Result, Row, RowLayout};
use tracing::{debug, instrument, trace};

use crate::mapper;

/// A live session borrowed from an expanded value handle.
pub struct QuerySession<'h> {
	guard: SessionGuard<'h>,
	writes: &'h Flag<bool>,
}

impl<'h> QuerySession<'h> {
	pub(crate) fn new(guard: SessionGuard<'h>, writes: &'h Flag<bool>) -> Self {
		Self {
			guard,
			writes,
		}
	}

	pub fn session_id(&self) -> SessionId {
		self.guard.session_id()
	}

	/// Prepares one statement. A statement that may write marks the owning
	/// handle dirty.
	#[instrument(name = "cursor::prepare", level = "debug", skip(self, sql), fields(session = %self.guard.session_id()))]
	pub fn prepare(&self, sql: &str) -> Result<PreparedQuery<'_>> {
		let statement = self.guard.prepare(sql)?;
		if !statement.readonly() {
			self.writes.set(true);
		}
		let columns = statement.columns();
		Ok(PreparedQuery {
			statement,
			columns,
		})
	}
}

pub struct PreparedQuery<'s> {
	statement: Statement<'s>,
	columns: Vec<ColumnInfo>,
}

impl<'s> PreparedQuery<'s> {
	pub fn sql(&self) -> &str {
		self.statement.sql()
	}

	pub fn columns(&self) -> &[ColumnInfo] {
		&self.columns
	}

	/// A fresh cursor over the statement's result rows.
	pub fn rows(&mut self) -> QueryCursor<'_> {
		let columns = self.columns.clone();
		let sql = self.statement.sql().to_string();
		QueryCursor {
			sql,
			columns,
			state: CursorState::Created(self.statement.rows()),
			layout: None,
			rows_produced: 0,
		}
	}

	pub fn finalize(self) -> Result<()> {
		self.statement.finalize()?;
		Ok(())
	}
}

enum CursorState<'p> {
	Created(RawRows<'p>),
	Iterating(RawRows<'p>),
	Exhausted,
}

/// Produces one host row per call until the statement is done.
///
/// The row layout is fixed on the first call. Once the cursor reports the
/// end of the rows, or an error, its engine cursor has been reset and it
/// only reports the end from then on. Reaching the end resets the statement
/// but does not finalize it: that happens in [`PreparedQuery::finalize`] or
/// when the [`PreparedQuery`] is dropped.
pub struct QueryCursor<'p> {
	sql: String,
	columns: Vec<ColumnInfo>,
	state: CursorState<'p>,
	layout: Option<Arc<RowLayout>>,
	rows_produced: usize,
}

impl<'p> QueryCursor<'p> {
	#[instrument(name = "cursor::next", level = "trace", skip(self), fields(rows = self.rows_produced))]
	pub fn next_row(&mut self) -> Result<Option<Row>> {
		let (mut rows, first) = match std::mem::replace(&mut self.state, CursorState::Exhausted) {
			CursorState::Exhausted => return Ok(None),
			CursorState::Created(rows) => (rows, true),
			CursorState::Iterating(rows) => (rows, false),
		};

		match rows.next_cells() {
			Ok(Some(cells)) => {
				if first {
					self.fix_layout(Some(&cells));
				}
				let row = self.convert(cells)?;
				self.state = CursorState::Iterating(rows);
				self.rows_produced += 1;
				Ok(Some(row))
			}
			Ok(None) => {
				if first {
					self.fix_layout(None);
				}
				drop(rows);
				debug!(rows = self.rows_produced, "cursor exhausted");
				Ok(None)
			}
			Err(err) => {
				drop(rows);
				debug!(rows = self.rows_produced, error = %err, "cursor failed");
				Err(err.into())
			}
		}
	}

	pub fn is_exhausted(&self) -> bool {
		matches!(self.state, CursorState::Exhausted)
	}

	/// The row layout, known after the first call.
	pub fn layout(&self) -> Option<&Arc<RowLayout>> {
		self.layout.as_ref()
	}

	pub fn rows_produced(&self) -> usize {
		self.rows_produced
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	fn fix_layout(&mut self, first: Option<&[Cell]>) {
		let descriptors = self
			.columns
			.iter()
			.enumerate()
			.map(|(idx, column)| {
				let ty = mapper::column_type(column, first.and_then(|cells| cells.get(idx)));
				ColumnDescriptor::new(column.name.clone(), ty)
			})
			.collect();
		let layout = RowLayout::new(descriptors);
		trace!(?layout, "fixed cursor layout");
		self.layout = Some(Arc::new(layout));
	}

	fn convert(&self, cells: Vec<Cell>) -> Result<Row> {
		let layout = match &self.layout {
			Some(layout) => layout.clone(),
			None => Arc::new(RowLayout::default()),
		};
		let values = layout.columns().iter().zip(cells).map(|(column, cell)| mapper::convert(column.ty, cell)).collect();
		Row::new(layout, values)
	}
}

impl Iterator for QueryCursor<'_> {
	type Item = Result<Row>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_row().transpose()
	}
}

impl FusedIterator for QueryCursor<'_> {}
