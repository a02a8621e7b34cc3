// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use litedatum_type::{
	Result,
	error::diagnostic::{
		engine::flat_too_large,
		flat::{buffer_too_short, length_mismatch},
	},
	return_error,
};

/// Size of the length header in front of every flat payload: a little-endian
/// `u32` total length followed by four reserved bytes.
pub const HEADER_SIZE: usize = 8;

/// Immutable flat form of a value: `[header][engine image]`.
///
/// The declared length always equals the true length of the buffer. Clones
/// share the same allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatBuffer(Arc<[u8]>);

impl FlatBuffer {
	/// Validates `bytes` as a complete flat buffer.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < HEADER_SIZE {
			return_error!(buffer_too_short(bytes.len()));
		}

		let declared = read_header(bytes);
		if declared != bytes.len() {
			return_error!(length_mismatch(declared, bytes.len()));
		}

		Ok(Self(Arc::from(bytes)))
	}

	/// Prefixes `payload` with a header. The configured size limit is
	/// checked by the codec; this only rejects totals the header cannot hold.
	pub(crate) fn encode(payload: &[u8]) -> Result<Self> {
		let total = HEADER_SIZE + payload.len();
		let header = write_header(total)?;
		let mut bytes = Vec::with_capacity(total);
		bytes.extend_from_slice(&header);
		bytes.extend_from_slice(payload);
		Ok(Self(Arc::from(bytes)))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn payload(&self) -> &[u8] {
		&self.0[HEADER_SIZE..]
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when the value holds no engine image, i.e. an empty database.
	pub fn is_empty(&self) -> bool {
		self.0.len() == HEADER_SIZE
	}

	pub fn declared_len(&self) -> usize {
		read_header(&self.0)
	}

	/// Whether both buffers share one allocation.
	pub fn ptr_eq(&self, other: &FlatBuffer) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

fn write_header(total: usize) -> Result<[u8; HEADER_SIZE]> {
	let Ok(declared) = u32::try_from(total) else {
		return_error!(flat_too_large(total, u32::MAX as usize));
	};
	let mut header = [0u8; HEADER_SIZE];
	header[..4].copy_from_slice(&declared.to_le_bytes());
	Ok(header)
}

fn read_header(bytes: &[u8]) -> usize {
	let mut len = [0u8; 4];
	len.copy_from_slice(&bytes[..4]);
	u32::from_le_bytes(len) as usize
}

impl AsRef<[u8]> for FlatBuffer {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl Debug for FlatBuffer {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlatBuffer").field("len", &self.len()).field("payload_len", &self.payload().len()).finish()
	}
}
