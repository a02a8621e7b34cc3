// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("{path}: {source}")]
	File {
		path: PathBuf,
		source: io::Error,
	},
	#[error("invalid config {path}: {source}")]
	Config {
		path: PathBuf,
		source: serde_json::Error,
	},
	#[error(transparent)]
	Output(#[from] io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("{0}")]
	Value(#[from] litedatum_type::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

impl CliError {
	pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
		CliError::File {
			path: path.into(),
			source,
		}
	}
}
