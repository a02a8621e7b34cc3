// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Flat values kept as plain files.

use std::{fs, path::Path};

use litedatum_value::{Scope, SessionConfig, ValueHandle, load_from_bytes};
use tracing::debug;

use crate::error::{CliError, CliResult};

pub fn load_config(path: Option<&Path>) -> CliResult<SessionConfig> {
	let Some(path) = path else {
		return Ok(SessionConfig::default());
	};
	let text = read_text(path)?;
	serde_json::from_str(&text).map_err(|source| CliError::Config {
		path: path.to_path_buf(),
		source,
	})
}

pub fn read_text(path: &Path) -> CliResult<String> {
	fs::read_to_string(path).map_err(|e| CliError::file(path, e))
}

pub fn read_bytes(path: &Path) -> CliResult<Vec<u8>> {
	fs::read(path).map_err(|e| CliError::file(path, e))
}

/// Wraps the stored bytes of `path` without expanding them.
pub fn read_value(scope: &Scope, path: &Path) -> CliResult<ValueHandle> {
	let bytes = read_bytes(path)?;
	debug!(path = %path.display(), len = bytes.len(), "read value");
	Ok(load_from_bytes(scope, &bytes)?)
}

/// Flattens `handle` and replaces the file at `path`. Returns the stored size.
pub fn write_value(handle: &mut ValueHandle, path: &Path) -> CliResult<usize> {
	let flat = handle.flatten()?;
	write_bytes(path, flat.as_bytes())?;
	debug!(path = %path.display(), len = flat.len(), "wrote value");
	Ok(flat.len())
}

/// Writes through a sibling temporary file so a failed write leaves the old
/// contents in place.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> CliResult<()> {
	let mut tmp = path.as_os_str().to_owned();
	tmp.push(".tmp");
	fs::write(&tmp, bytes).map_err(|e| CliError::file(&tmp, e))?;
	fs::rename(&tmp, path).map_err(|e| CliError::file(path, e))
}
