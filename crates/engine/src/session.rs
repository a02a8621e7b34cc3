// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::{Cell, Ref, RefCell},
	fmt::{self, Display, Formatter},
	sync::atomic::{AtomicU64, Ordering},
};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
	EngineError, EngineResult, SessionConfig, dump,
	error::engine_message,
};

const MAIN_SCHEMA: &str = "main";

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// One private in-memory database.
///
/// The connection lives behind a `RefCell` so that a scope can close the
/// session while a value handle still holds it. Once closed, every operation
/// fails with [`EngineError::Closed`]. Closing while a [`SessionGuard`] is
/// alive is deferred until the guard is dropped.
pub struct Session {
	id: SessionId,
	conn: RefCell<Option<Connection>>,
	closed: Cell<bool>,
	config: SessionConfig,
}

impl Session {
	#[instrument(name = "session::open", level = "debug", skip(config), fields(page_size = config.page_size))]
	pub fn open(config: SessionConfig) -> EngineResult<Self> {
		let conn = Connection::open_in_memory_with_flags(config.flags.convert())
			.map_err(|e| EngineError::Open(engine_message(&e)))?;

		configure(&conn, &config).map_err(|e| EngineError::Open(engine_message(&e)))?;

		let id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
		debug!(session = %id, "opened engine session");

		Ok(Self {
			id,
			conn: RefCell::new(Some(conn)),
			closed: Cell::new(false),
			config,
		})
	}

	pub fn id(&self) -> SessionId {
		self.id
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn is_closed(&self) -> bool {
		self.closed.get()
	}

	/// Closes the session. Returns `false` if it was already closed.
	#[instrument(name = "session::close", level = "debug", skip(self), fields(session = %self.id))]
	pub fn close(&self) -> bool {
		if self.closed.replace(true) {
			return false;
		}

		match self.conn.try_borrow_mut() {
			Ok(mut slot) => {
				if let Some(conn) = slot.take() {
					close_connection(self.id, conn);
				}
			}
			Err(_) => warn!(session = %self.id, "session in use, close deferred"),
		}
		true
	}

	fn finish_deferred_close(&self) {
		if !self.closed.get() {
			return;
		}
		if let Ok(mut slot) = self.conn.try_borrow_mut() {
			if let Some(conn) = slot.take() {
				debug!(session = %self.id, "completing deferred close");
				close_connection(self.id, conn);
			}
		}
	}

	/// Borrows the connection for statement work.
	pub fn lock(&self) -> EngineResult<SessionGuard<'_>> {
		if self.closed.get() {
			return Err(EngineError::Closed(self.id));
		}
		let slot = self.conn.try_borrow().map_err(|_| EngineError::Busy(self.id))?;
		let conn = Ref::filter_map(slot, |c| c.as_ref()).map_err(|_| EngineError::Closed(self.id))?;
		Ok(SessionGuard {
			session: self,
			conn: Some(conn),
		})
	}

	pub fn exec(&self, sql: &str) -> EngineResult<()> {
		self.lock()?.exec(sql)
	}

	pub fn serialize(&self) -> EngineResult<Vec<u8>> {
		self.lock()?.serialize()
	}

	pub fn dump(&self) -> EngineResult<String> {
		let mut out = String::new();
		self.lock()?.dump_into(&mut out)?;
		Ok(out)
	}

	/// Replaces the database with a serialized image. An empty payload leaves
	/// the fresh, empty database in place.
	#[instrument(name = "session::load", level = "debug", skip(self, payload), fields(session = %self.id, len = payload.len()))]
	pub fn load(&self, payload: &[u8]) -> EngineResult<()> {
		if self.closed.get() {
			return Err(EngineError::Closed(self.id));
		}
		if payload.is_empty() {
			return Ok(());
		}

		let mut slot = self.conn.try_borrow_mut().map_err(|_| EngineError::Busy(self.id))?;
		let conn = slot.as_mut().ok_or(EngineError::Closed(self.id))?;

		conn.deserialize_read_exact(MAIN_SCHEMA, payload, payload.len(), false)
			.map_err(|e| EngineError::Load(engine_message(&e)))?;

		// corrupt images are only detected once the schema is read
		conn.query_row("SELECT count(*) FROM sqlite_schema", [], |row| row.get::<_, i64>(0))
			.map_err(|e| EngineError::Load(engine_message(&e)))?;

		Ok(())
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		self.close();
	}
}

fn configure(conn: &Connection, config: &SessionConfig) -> rusqlite::Result<()> {
	conn.execute_batch(&format!(
		"PRAGMA page_size = {}; PRAGMA cache_size = -{}; PRAGMA temp_store = {}; PRAGMA foreign_keys = {};",
		config.page_size,
		config.cache_size,
		config.temp_store.as_str(),
		if config.foreign_keys { "ON" } else { "OFF" },
	))
}

fn close_connection(id: SessionId, conn: Connection) {
	if let Err((_, e)) = conn.close() {
		tracing::error!(session = %id, error = %e, "failed to close engine session");
	} else {
		debug!(session = %id, "closed engine session");
	}
}

/// Shared borrow of a live session's connection.
pub struct SessionGuard<'s> {
	pub(crate) session: &'s Session,
	conn: Option<Ref<'s, Connection>>,
}

impl<'s> SessionGuard<'s> {
	pub fn session_id(&self) -> SessionId {
		self.session.id
	}

	pub(crate) fn connection(&self) -> EngineResult<&Connection> {
		self.conn.as_deref().ok_or(EngineError::Closed(self.session.id))
	}

	#[instrument(name = "session::exec", level = "debug", skip(self, sql), fields(session = %self.session.id, len = sql.len()))]
	pub fn exec(&self, sql: &str) -> EngineResult<()> {
		self.connection()?.execute_batch(sql).map_err(|e| EngineError::Statement {
			statement: sql.to_string(),
			message: engine_message(&e),
		})
	}

	/// The database image. A database that never allocated a page serializes
	/// to an empty payload.
	#[instrument(name = "session::serialize", level = "debug", skip(self), fields(session = %self.session.id))]
	pub fn serialize(&self) -> EngineResult<Vec<u8>> {
		let conn = self.connection()?;
		let pages = self.page_count()?;
		if pages == 0 {
			return Ok(Vec::new());
		}

		let data = conn.serialize(MAIN_SCHEMA).map_err(|e| EngineError::Serialize(engine_message(&e)))?;
		debug!(pages, len = data.len(), "serialized session");
		Ok(data.to_vec())
	}

	#[instrument(name = "session::dump", level = "debug", skip(self, out), fields(session = %self.session.id))]
	pub fn dump_into<W: fmt::Write>(&self, out: &mut W) -> EngineResult<()> {
		dump::dump_into(self.connection()?, out)
	}

	pub fn page_count(&self) -> EngineResult<u64> {
		self.pragma_u64("page_count")
	}

	pub fn page_size(&self) -> EngineResult<u64> {
		self.pragma_u64("page_size")
	}

	/// Names of user tables in creation order.
	pub fn tables(&self) -> EngineResult<Vec<String>> {
		let conn = self.connection()?;
		let sql = "SELECT name FROM sqlite_schema WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid";
		let prepare_err = |e: rusqlite::Error| EngineError::Prepare {
			statement: sql.to_string(),
			message: engine_message(&e),
		};
		let step_err = |e: rusqlite::Error| EngineError::Step {
			statement: sql.to_string(),
			message: engine_message(&e),
		};

		let mut stmt = conn.prepare(sql).map_err(prepare_err)?;
		let names = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(step_err)?;
		names.collect::<rusqlite::Result<Vec<_>>>().map_err(step_err)
	}

	fn pragma_u64(&self, name: &str) -> EngineResult<u64> {
		let value: i64 = self
			.connection()?
			.query_row(&format!("PRAGMA {}", name), [], |row| row.get(0))
			.map_err(|e| EngineError::Serialize(engine_message(&e)))?;
		Ok(value.max(0) as u64)
	}
}

impl Drop for SessionGuard<'_> {
	fn drop(&mut self) {
		self.conn.take();
		self.session.finish_deferred_close();
	}
}
