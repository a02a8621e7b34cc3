// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversion between engine sessions and flat buffers.

use litedatum_engine::Session;
use litedatum_type::{
	Result,
	error::diagnostic::{engine::flat_too_large, flat::payload_too_large},
	return_error,
};
use tracing::{debug, instrument};

use crate::{FlatBuffer, HEADER_SIZE};

/// Total flat size for an engine image of `payload_len` bytes.
pub fn flat_size(payload_len: usize) -> usize {
	HEADER_SIZE + payload_len
}

/// Wraps an engine image into a flat buffer no larger than `max` bytes.
pub fn encode(payload: &[u8], max: usize) -> Result<FlatBuffer> {
	let size = flat_size(payload.len());
	if size > max {
		return_error!(flat_too_large(size, max));
	}
	FlatBuffer::encode(payload)
}

/// Validates stored bytes as a flat buffer no larger than `max` bytes.
pub fn decode(bytes: &[u8], max: usize) -> Result<FlatBuffer> {
	if bytes.len() > max {
		return_error!(payload_too_large(bytes.len(), max));
	}
	FlatBuffer::from_bytes(bytes)
}

#[instrument(name = "codec::serialize", level = "debug", skip(session), fields(session = %session.id()))]
pub fn serialize(session: &Session, max: usize) -> Result<FlatBuffer> {
	let payload = session.serialize()?;
	let flat = encode(&payload, max)?;
	debug!(len = flat.len(), "encoded flat buffer");
	Ok(flat)
}

/// Loads a flat buffer into a freshly opened session.
#[instrument(name = "codec::deserialize", level = "debug", skip(flat, session), fields(session = %session.id(), len = flat.len()))]
pub fn deserialize(flat: &FlatBuffer, session: &Session) -> Result<()> {
	session.load(flat.payload())?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use litedatum_engine::SessionConfig;
	use litedatum_type::ErrorKind;

	use super::*;

	#[test]
	fn test_flat_size() {
		assert_eq!(flat_size(0), HEADER_SIZE);
		assert_eq!(flat_size(4096), HEADER_SIZE + 4096);
	}

	#[test]
	fn test_encode_respects_max() {
		assert!(encode(&[0; 8], 16).is_ok());
		let err = encode(&[0; 9], 16).unwrap_err();
		assert_eq!(err.code, "SERIALIZE_002");
		assert_eq!(err.kind(), ErrorKind::EngineSerialize);
	}

	#[test]
	fn test_decode_respects_max() {
		let flat = encode(&[7; 32], 1024).unwrap();
		let err = decode(flat.as_bytes(), 16).unwrap_err();
		assert_eq!(err.code, "LOAD_003");
		assert_eq!(decode(flat.as_bytes(), 1024).unwrap(), flat);
	}

	#[test]
	fn test_serialize_deserialize() {
		let source = Session::open(SessionConfig::in_memory()).unwrap();
		source.exec("CREATE TABLE t(a); INSERT INTO t VALUES (1);").unwrap();
		let flat = serialize(&source, usize::MAX).unwrap();
		assert_eq!(flat.declared_len(), flat.len());

		let target = Session::open(SessionConfig::in_memory()).unwrap();
		deserialize(&flat, &target).unwrap();
		assert_eq!(serialize(&target, usize::MAX).unwrap(), flat);
	}

	#[test]
	fn test_deserialize_rejects_garbage_payload() {
		let flat = encode(&[0x55; 512], usize::MAX).unwrap();
		let session = Session::open(SessionConfig::in_memory()).unwrap();
		let err = deserialize(&flat, &session).unwrap_err();
		assert_eq!(err.code, "LOAD_004");
		assert_eq!(err.kind(), ErrorKind::EngineLoad);
	}
}
