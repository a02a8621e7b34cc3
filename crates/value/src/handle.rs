// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::Cell,
	fmt::{Debug, Formatter},
	rc::Rc,
};

use litedatum_engine::{Session, SessionConfig, SessionId};
use litedatum_type::{
	Error, Result, Row,
	error::diagnostic::handle::{flat_size_mismatch, scope_released, session_closed},
	internal_error, return_error,
};
use tracing::{debug, instrument, warn};

use crate::{
	FlatBuffer, QueryCursor, QuerySession, codec,
	scope::{Scope, ScopeRef},
};

/// Host-side flattening protocol: size the flat form, then write it into
/// host-allocated memory of exactly that size.
pub trait FlatRepr {
	fn flat_size(&mut self) -> Result<usize>;

	fn flatten_into(&mut self, out: &mut [u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleStats {
	/// Sessions opened for this handle
	pub expansions: u64,
	/// Engine serializations performed by `flatten`
	pub serializations: u64,
}

/// Engine statistics of an expanded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueInfo {
	pub tables: Vec<String>,
	pub page_count: u64,
	pub page_size: u64,
	pub flat_size: usize,
}

enum Repr {
	Flat(FlatBuffer),
	ExpandedDirty(Rc<Session>),
	ExpandedClean(Rc<Session>, FlatBuffer),
	Poisoned(SessionId),
}

/// An embedded database value, either flat bytes or a live session.
///
/// A flat handle expands lazily on first use into a session bound to the
/// handle's scope. An expanded handle caches the flat form it last produced
/// or was loaded from; every mutation drops that cache. Once the owning
/// scope has closed the session the handle is poisoned and every operation
/// fails with `HANDLE_001`.
pub struct ValueHandle {
	repr: Repr,
	scope: ScopeRef,
	config: SessionConfig,
	stats: HandleStats,
	writes: Cell<bool>,
}

impl ValueHandle {
	/// Opens a session in `scope` and seeds it with `script`.
	#[instrument(name = "value::create", level = "debug", skip(scope, script), fields(scope = scope.name(), len = script.len()))]
	pub fn from_script(scope: &Scope, script: &str) -> Result<Self> {
		let mut handle = Self::new(scope, Repr::ExpandedDirty(open_bound(scope)?));
		handle.stats.expansions = 1;
		handle.exec(script)?;
		Ok(handle)
	}

	/// Wraps stored bytes without expanding them. The header is validated
	/// here; the engine image is validated on first expansion.
	pub fn from_bytes(scope: &Scope, bytes: &[u8]) -> Result<Self> {
		let flat = codec::decode(bytes, scope.config().max_flat_size)?;
		Ok(Self::from_flat(scope, flat))
	}

	pub fn from_flat(scope: &Scope, flat: FlatBuffer) -> Self {
		Self::new(scope, Repr::Flat(flat))
	}

	/// Wraps a raw engine image and expands it immediately.
	pub fn from_image(scope: &Scope, image: &[u8]) -> Result<Self> {
		let flat = codec::encode(image, scope.config().max_flat_size)?;
		let mut handle = Self::from_flat(scope, flat);
		handle.expand()?;
		Ok(handle)
	}

	fn new(scope: &Scope, repr: Repr) -> Self {
		Self {
			repr,
			scope: scope.downgrade(),
			config: scope.config().clone(),
			stats: HandleStats::default(),
			writes: Cell::new(false),
		}
	}

	pub fn is_expanded(&self) -> bool {
		matches!(self.repr, Repr::ExpandedDirty(_) | Repr::ExpandedClean(..))
	}

	pub fn is_poisoned(&self) -> bool {
		matches!(self.repr, Repr::Poisoned(_))
	}

	/// True when an expanded handle holds an up to date flat form.
	pub fn is_clean(&self) -> bool {
		!self.writes.get() && matches!(self.repr, Repr::Flat(_) | Repr::ExpandedClean(..))
	}

	pub fn stats(&self) -> HandleStats {
		self.stats
	}

	pub fn session_id(&self) -> Option<SessionId> {
		match &self.repr {
			Repr::Flat(_) => None,
			Repr::ExpandedDirty(s) | Repr::ExpandedClean(s, _) => Some(s.id()),
			Repr::Poisoned(id) => Some(*id),
		}
	}

	pub fn scope_name(&self) -> &str {
		self.scope.name()
	}

	/// Turns a flat handle into an expanded one. No-op when already expanded.
	#[instrument(name = "value::expand", level = "debug", skip(self), fields(scope = self.scope.name()))]
	pub fn expand(&mut self) -> Result<()> {
		let flat = match &self.repr {
			Repr::Flat(flat) => flat.clone(),
			Repr::ExpandedDirty(session) | Repr::ExpandedClean(session, _) => {
				return if session.is_closed() {
					Err(self.poison())
				} else {
					Ok(())
				};
			}
			Repr::Poisoned(id) => return_error!(session_closed(id.0)),
		};

		if self.scope.is_released() {
			return_error!(scope_released(self.scope.name()));
		}

		let session = Rc::new(Session::open(self.config.clone())?);
		self.scope.bind(&session)?;
		codec::deserialize(&flat, &session)?;

		self.stats.expansions += 1;
		debug!(session = %session.id(), len = flat.len(), "expanded value");
		self.repr = Repr::ExpandedClean(session, flat);
		Ok(())
	}

	/// Drops the cached flat form. No-op for flat handles.
	pub fn invalidate(&mut self) {
		self.writes.set(false);
		if let Repr::ExpandedClean(session, _) = &self.repr {
			self.repr = Repr::ExpandedDirty(session.clone());
		}
	}

	#[instrument(name = "value::flatten", level = "debug", skip(self), fields(scope = self.scope.name()))]
	pub fn flatten(&mut self) -> Result<FlatBuffer> {
		self.sync_writes();
		match &self.repr {
			Repr::Flat(flat) => Ok(flat.clone()),
			Repr::ExpandedClean(session, flat) => {
				if session.is_closed() {
					return Err(self.poison());
				}
				Ok(flat.clone())
			}
			Repr::ExpandedDirty(session) => {
				if session.is_closed() {
					return Err(self.poison());
				}
				let session = session.clone();
				let flat = codec::serialize(&session, self.config.max_flat_size)?;
				self.stats.serializations += 1;
				self.repr = Repr::ExpandedClean(session, flat.clone());
				Ok(flat)
			}
			Repr::Poisoned(id) => return_error!(session_closed(id.0)),
		}
	}

	pub fn flat_size(&mut self) -> Result<usize> {
		Ok(self.flatten()?.len())
	}

	/// Raw engine image without the flat header.
	pub fn export_image(&mut self) -> Result<Vec<u8>> {
		Ok(self.flatten()?.payload().to_vec())
	}

	/// Runs a statement batch. The cached flat form is dropped even when the
	/// batch fails, since earlier statements of the batch may have applied.
	#[instrument(name = "value::exec", level = "debug", skip(self, sql), fields(scope = self.scope.name(), len = sql.len()))]
	pub fn exec(&mut self, sql: &str) -> Result<()> {
		let session = self.live_session()?;
		self.invalidate();
		session.exec(sql).map_err(|e| self.observe(e.into()))
	}

	pub fn dump_text(&mut self) -> Result<String> {
		let session = self.live_session()?;
		session.dump().map_err(|e| self.observe(e.into()))
	}

	pub fn info(&mut self) -> Result<ValueInfo> {
		let flat_size = self.flat_size()?;
		let session = self.live_session()?;
		let guard = session.lock()?;
		Ok(ValueInfo {
			tables: guard.tables()?,
			page_count: guard.page_count()?,
			page_size: guard.page_size()?,
			flat_size,
		})
	}

	/// Borrows the live session for queries.
	pub fn session(&mut self) -> Result<QuerySession<'_>> {
		self.live_session()?;
		let session = match &self.repr {
			Repr::ExpandedDirty(session) | Repr::ExpandedClean(session, _) => session,
			Repr::Flat(_) | Repr::Poisoned(_) => return_error!(internal_error!("handle not expanded after expansion")),
		};
		Ok(QuerySession::new(session.lock()?, &self.writes))
	}

	/// Prepares `sql`, hands the cursor to `f` and finalizes afterwards.
	pub fn query_with<T, F>(&mut self, sql: &str, f: F) -> Result<T>
	where
		F: FnOnce(&mut QueryCursor<'_>) -> Result<T>,
	{
		let session = self.session()?;
		let mut prepared = session.prepare(sql)?;
		let result = {
			let mut cursor = prepared.rows();
			f(&mut cursor)?
		};
		prepared.finalize()?;
		Ok(result)
	}

	pub fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>> {
		self.query_with(sql, |cursor| cursor.collect())
	}

	fn live_session(&mut self) -> Result<Rc<Session>> {
		self.expand()?;
		match &self.repr {
			Repr::ExpandedDirty(session) | Repr::ExpandedClean(session, _) => Ok(session.clone()),
			Repr::Poisoned(id) => return_error!(session_closed(id.0)),
			Repr::Flat(_) => return_error!(internal_error!("handle not expanded after expansion")),
		}
	}

	fn sync_writes(&mut self) {
		if self.writes.get() {
			self.invalidate();
		}
	}

	fn observe(&mut self, err: Error) -> Error {
		match &self.repr {
			Repr::ExpandedDirty(session) | Repr::ExpandedClean(session, _) if session.is_closed() => self.poison(),
			_ => err,
		}
	}

	fn poison(&mut self) -> Error {
		let id = match &self.repr {
			Repr::ExpandedDirty(session) | Repr::ExpandedClean(session, _) => session.id(),
			Repr::Poisoned(id) => *id,
			Repr::Flat(_) => SessionId(0),
		};
		warn!(session = %id, scope = self.scope.name(), "value used after its session was closed");
		self.repr = Repr::Poisoned(id);
		litedatum_type::error!(session_closed(id.0).with_note(format!("released scope: `{}`", self.scope.name())))
	}
}

fn open_bound(scope: &Scope) -> Result<Rc<Session>> {
	if scope.is_released() {
		return_error!(scope_released(scope.name()));
	}
	let session = Rc::new(Session::open(scope.config().clone())?);
	scope.bind(&session)?;
	Ok(session)
}

impl FlatRepr for ValueHandle {
	fn flat_size(&mut self) -> Result<usize> {
		ValueHandle::flat_size(self)
	}

	fn flatten_into(&mut self, out: &mut [u8]) -> Result<()> {
		let flat = self.flatten()?;
		if out.len() != flat.len() {
			return_error!(flat_size_mismatch(flat.len(), out.len()));
		}
		out.copy_from_slice(flat.as_bytes());
		Ok(())
	}
}

impl Debug for ValueHandle {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let state = match &self.repr {
			Repr::Flat(_) => "flat",
			Repr::ExpandedDirty(_) => "expanded-dirty",
			Repr::ExpandedClean(..) => "expanded-clean",
			Repr::Poisoned(_) => "poisoned",
		};
		f.debug_struct("ValueHandle")
			.field("state", &state)
			.field("session", &self.session_id())
			.field("scope", &self.scope.name())
			.field("stats", &self.stats)
			.finish()
	}
}
