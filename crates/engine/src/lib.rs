// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Wrapper around an in-memory SQLite connection: open, execute, serialize,
//! deserialize, dump and close, plus low-level row stepping for cursors.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod cell;
mod config;
pub mod dump;
mod error;
mod session;
mod statement;

pub use cell::{Cell, EngineType};
pub use config::{MAX_FLAT_SIZE, OpenFlags, SessionConfig, TempStore};
pub use error::{EngineError, EngineResult};
pub use session::{Session, SessionGuard, SessionId};
pub use statement::{ColumnInfo, RawRows, Statement};
