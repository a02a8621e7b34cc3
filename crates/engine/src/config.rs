// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Deserializer, Serialize};

/// Largest total size of a flat value, header included.
pub const MAX_FLAT_SIZE: usize = 0x3FFF_FFFF;

/// Configuration applied to every engine session when it is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	pub flags: OpenFlags,
	pub page_size: u32,
	/// Page cache size in KiB
	pub cache_size: u32,
	pub temp_store: TempStore,
	pub foreign_keys: bool,
	#[serde(deserialize_with = "capped_flat_size")]
	pub max_flat_size: usize,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			flags: OpenFlags::default(),
			page_size: 4096,
			cache_size: 2000,
			temp_store: TempStore::Memory,
			foreign_keys: true,
			max_flat_size: MAX_FLAT_SIZE,
		}
	}
}

impl SessionConfig {
	pub fn in_memory() -> Self {
		Self::default()
	}

	pub fn flags(mut self, flags: OpenFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn page_size(mut self, page_size: u32) -> Self {
		self.page_size = page_size;
		self
	}

	pub fn cache_size(mut self, cache_size_kib: u32) -> Self {
		self.cache_size = cache_size_kib;
		self
	}

	pub fn temp_store(mut self, temp_store: TempStore) -> Self {
		self.temp_store = temp_store;
		self
	}

	pub fn foreign_keys(mut self, enabled: bool) -> Self {
		self.foreign_keys = enabled;
		self
	}

	pub fn max_flat_size(mut self, max: usize) -> Self {
		self.max_flat_size = max.min(MAX_FLAT_SIZE);
		self
	}
}

fn capped_flat_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(usize::deserialize(deserializer)?.min(MAX_FLAT_SIZE))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFlags {
	pub read_write: bool,
	pub create: bool,
	pub no_mutex: bool,
	pub private_cache: bool,
}

impl Default for OpenFlags {
	fn default() -> Self {
		Self {
			read_write: true,
			create: true,
			no_mutex: true,
			private_cache: false,
		}
	}
}

impl OpenFlags {
	pub(crate) fn convert(&self) -> rusqlite::OpenFlags {
		let mut rusqlite_flags = rusqlite::OpenFlags::empty();

		if self.read_write {
			rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
		}
		if self.create {
			rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
		}
		if self.no_mutex {
			rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
		}
		if self.private_cache {
			rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE;
		}

		rusqlite_flags
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempStore {
	Default,
	File,
	Memory,
}

impl TempStore {
	pub fn as_str(&self) -> &'static str {
		match self {
			TempStore::Default => "DEFAULT",
			TempStore::File => "FILE",
			TempStore::Memory => "MEMORY",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = SessionConfig::default();
		assert_eq!(config.page_size, 4096);
		assert_eq!(config.temp_store, TempStore::Memory);
		assert!(config.foreign_keys);
		assert_eq!(config.max_flat_size, MAX_FLAT_SIZE);
	}

	#[test]
	fn test_builder() {
		let config = SessionConfig::in_memory()
			.page_size(8192)
			.cache_size(512)
			.temp_store(TempStore::File)
			.foreign_keys(false)
			.max_flat_size(1024);
		assert_eq!(config.page_size, 8192);
		assert_eq!(config.cache_size, 512);
		assert_eq!(config.temp_store, TempStore::File);
		assert!(!config.foreign_keys);
		assert_eq!(config.max_flat_size, 1024);
	}

	#[test]
	fn test_max_flat_size_is_capped() {
		let config = SessionConfig::in_memory().max_flat_size(usize::MAX);
		assert_eq!(config.max_flat_size, MAX_FLAT_SIZE);
	}

	#[test]
	fn test_convert_flags() {
		let flags = OpenFlags::default().convert();
		assert!(flags.contains(rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE));
		assert!(flags.contains(rusqlite::OpenFlags::SQLITE_OPEN_CREATE));
		assert!(flags.contains(rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX));
		assert!(!flags.contains(rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE));

		let flags = OpenFlags {
			private_cache: true,
			..OpenFlags::default()
		}
		.convert();
		assert!(flags.contains(rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE));
	}

	#[test]
	fn test_deserialize_partial_json() {
		let config: SessionConfig = serde_json::from_str(r#"{"page_size": 1024, "temp_store": "file"}"#).unwrap();
		assert_eq!(config.page_size, 1024);
		assert_eq!(config.temp_store, TempStore::File);
		assert_eq!(config.cache_size, 2000);
		assert!(config.flags.read_write);
	}

	#[test]
	fn test_deserialize_caps_max_flat_size() {
		let config: SessionConfig = serde_json::from_str(r#"{"max_flat_size": 1099511627776}"#).unwrap();
		assert_eq!(config.max_flat_size, MAX_FLAT_SIZE);

		let config: SessionConfig = serde_json::from_str(r#"{"max_flat_size": 65536}"#).unwrap();
		assert_eq!(config.max_flat_size, 65536);
	}
}
