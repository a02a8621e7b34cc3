// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::RefCell,
	fmt::{Debug, Formatter},
	rc::{Rc, Weak},
	sync::atomic::{AtomicU64, Ordering},
};

use litedatum_engine::{MAX_FLAT_SIZE, Session, SessionConfig, SessionId};
use litedatum_type::{Result, error::diagnostic::handle::scope_released, return_error};
use tracing::{debug, instrument, trace};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// A lifetime region owning the teardown of every session expanded in it.
///
/// Releasing a scope, explicitly or by dropping its last clone, first
/// releases its live child scopes and then closes its own sessions in
/// reverse binding order. Each session is closed at most once.
#[derive(Clone)]
pub struct Scope {
	inner: Rc<ScopeInner>,
}

struct ScopeInner {
	id: u64,
	name: String,
	config: SessionConfig,
	state: RefCell<ScopeState>,
}

#[derive(Default)]
struct ScopeState {
	released: bool,
	bindings: Vec<Binding>,
	children: Vec<Weak<ScopeInner>>,
}

struct Binding {
	session: Weak<Session>,
	teardown: Box<dyn FnOnce() -> bool>,
}

impl Binding {
	fn is_live(&self) -> bool {
		self.session.upgrade().is_some_and(|s| !s.is_closed())
	}
}

impl Scope {
	pub fn new(name: impl Into<String>) -> Self {
		Self::with_config(name, SessionConfig::default())
	}

	/// `max_flat_size` is capped at [`MAX_FLAT_SIZE`] whatever `config` holds.
	pub fn with_config(name: impl Into<String>, config: SessionConfig) -> Self {
		let max_flat_size = config.max_flat_size;
		let config = config.max_flat_size(max_flat_size);
		let inner = ScopeInner {
			id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
			name: name.into(),
			config,
			state: RefCell::new(ScopeState::default()),
		};
		trace!(scope = inner.id, name = %inner.name, "created scope");
		Self {
			inner: Rc::new(inner),
		}
	}

	/// Opens a nested scope sharing this scope's configuration. The child is
	/// released no later than its parent.
	pub fn child(&self, name: impl Into<String>) -> Result<Scope> {
		let mut state = self.inner.state.borrow_mut();
		if state.released {
			return_error!(scope_released(&self.inner.name));
		}

		let child = Scope::with_config(name, self.inner.config.clone());
		state.children.retain(|c| c.strong_count() > 0);
		state.children.push(Rc::downgrade(&child.inner));
		Ok(child)
	}

	pub fn bind(&self, session: &Rc<Session>) -> Result<()> {
		self.inner.bind(session)
	}

	/// Runs all teardowns. Returns how many sessions were closed by this call.
	pub fn release(&self) -> usize {
		self.inner.release()
	}

	pub fn is_released(&self) -> bool {
		self.inner.state.borrow().released
	}

	/// Number of bound sessions that are still open.
	pub fn binding_count(&self) -> usize {
		self.inner.state.borrow().bindings.iter().filter(|b| b.is_live()).count()
	}

	pub fn name(&self) -> &str {
		&self.inner.name
	}

	pub fn config(&self) -> &SessionConfig {
		&self.inner.config
	}

	pub(crate) fn downgrade(&self) -> ScopeRef {
		ScopeRef {
			name: self.inner.name.clone(),
			inner: Rc::downgrade(&self.inner),
		}
	}
}

impl Debug for Scope {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Scope")
			.field("id", &self.inner.id)
			.field("name", &self.inner.name)
			.field("released", &self.is_released())
			.finish()
	}
}

impl ScopeInner {
	fn bind(&self, session: &Rc<Session>) -> Result<()> {
		let mut state = self.state.borrow_mut();
		if state.released {
			return_error!(scope_released(&self.name));
		}

		let id: SessionId = session.id();
		let weak = Rc::downgrade(session);
		let teardown = {
			let weak = weak.clone();
			Box::new(move || weak.upgrade().is_some_and(|s| s.close()))
		};

		state.bindings.retain(Binding::is_live);
		state.bindings.push(Binding {
			session: weak,
			teardown,
		});
		trace!(scope = self.id, session = %id, "bound session");
		Ok(())
	}

	#[instrument(name = "scope::release", level = "debug", skip(self), fields(scope = self.id, name = %self.name))]
	fn release(&self) -> usize {
		let (children, bindings) = {
			let mut state = self.state.borrow_mut();
			if state.released {
				return 0;
			}
			state.released = true;
			(std::mem::take(&mut state.children), std::mem::take(&mut state.bindings))
		};

		let mut closed = 0;
		for child in children.iter().rev() {
			if let Some(child) = child.upgrade() {
				closed += child.release();
			}
		}
		for binding in bindings.into_iter().rev() {
			if (binding.teardown)() {
				closed += 1;
			}
		}

		debug!(closed, "released scope");
		closed
	}
}

impl Drop for ScopeInner {
	fn drop(&mut self) {
		self.release();
	}
}

/// Non-owning reference from a value handle to the scope it expands into.
#[derive(Clone)]
pub(crate) struct ScopeRef {
	name: String,
	inner: Weak<ScopeInner>,
}

impl ScopeRef {
	pub(crate) fn bind(&self, session: &Rc<Session>) -> Result<()> {
		match self.inner.upgrade() {
			Some(scope) => scope.bind(session),
			None => return_error!(scope_released(&self.name)),
		}
	}

	pub(crate) fn is_released(&self) -> bool {
		self.inner.upgrade().is_none_or(|scope| scope.state.borrow().released)
	}

	pub(crate) fn name(&self) -> &str {
		&self.name
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn open(scope: &Scope) -> Rc<Session> {
		let session = Rc::new(Session::open(scope.config().clone()).unwrap());
		scope.bind(&session).unwrap();
		session
	}

	#[test]
	fn test_release_closes_bound_sessions() {
		let scope = Scope::new("call");
		let a = open(&scope);
		let b = open(&scope);
		assert_eq!(scope.binding_count(), 2);

		assert_eq!(scope.release(), 2);
		assert!(a.is_closed());
		assert!(b.is_closed());
		assert!(scope.is_released());
		assert_eq!(scope.binding_count(), 0);
	}

	#[test]
	fn test_release_is_idempotent() {
		let scope = Scope::new("call");
		let _a = open(&scope);
		assert_eq!(scope.release(), 1);
		assert_eq!(scope.release(), 0);
	}

	#[test]
	fn test_already_closed_session_is_noop() {
		let scope = Scope::new("call");
		let a = open(&scope);
		assert!(a.close());
		assert_eq!(scope.release(), 0);
	}

	#[test]
	fn test_dropped_session_is_noop() {
		let scope = Scope::new("call");
		let a = open(&scope);
		drop(a);
		assert_eq!(scope.binding_count(), 0);
		assert_eq!(scope.release(), 0);
	}

	#[test]
	fn test_drop_releases() {
		let session = {
			let scope = Scope::new("call");
			open(&scope)
		};
		assert!(session.is_closed());
	}

	#[test]
	fn test_clone_does_not_release() {
		let scope = Scope::new("call");
		let session = open(&scope);
		drop(scope.clone());
		assert!(!session.is_closed());
		drop(scope);
		assert!(session.is_closed());
	}

	#[test]
	fn test_bind_after_release_fails() {
		let scope = Scope::new("txn");
		scope.release();
		let session = Rc::new(Session::open(SessionConfig::in_memory()).unwrap());
		let err = scope.bind(&session).unwrap_err();
		assert_eq!(err.code, "HANDLE_002");
		assert!(err.message.contains("txn"));
	}

	#[test]
	fn test_children_release_first() {
		let parent = Scope::new("parent");
		let outer = open(&parent);
		let child = parent.child("child").unwrap();
		let inner = open(&child);

		assert_eq!(parent.release(), 2);
		assert!(child.is_released());
		assert!(inner.is_closed());
		assert!(outer.is_closed());
	}

	#[test]
	fn test_child_released_alone() {
		let parent = Scope::new("parent");
		let outer = open(&parent);
		let child = parent.child("child").unwrap();
		let inner = open(&child);

		assert_eq!(child.release(), 1);
		assert!(inner.is_closed());
		assert!(!outer.is_closed());
		assert_eq!(parent.release(), 1);
	}

	#[test]
	fn test_child_inherits_config() {
		let parent = Scope::with_config("p", SessionConfig::in_memory().page_size(1024));
		let child = parent.child("c").unwrap();
		assert_eq!(child.config().page_size, 1024);
		assert_eq!(child.name(), "c");
	}

	#[test]
	fn test_config_max_flat_size_is_capped() {
		let mut config = SessionConfig::in_memory();
		config.max_flat_size = usize::MAX;
		let scope = Scope::with_config("s", config);
		assert_eq!(scope.config().max_flat_size, MAX_FLAT_SIZE);
	}

	#[test]
	fn test_child_of_released_scope_fails() {
		let parent = Scope::new("p");
		parent.release();
		assert_eq!(parent.child("c").unwrap_err().code, "HANDLE_002");
	}

	#[test]
	fn test_scope_ref() {
		let scope = Scope::new("s");
		let weak = scope.downgrade();
		assert!(!weak.is_released());
		assert_eq!(weak.name(), "s");
		drop(scope);
		assert!(weak.is_released());
		let session = Rc::new(Session::open(SessionConfig::in_memory()).unwrap());
		assert_eq!(weak.bind(&session).unwrap_err().code, "HANDLE_002");
	}
}
