//! JSON encoding and decoding.

use crate::error::{ProtocolError, ProtocolResult};
use crate::messages::SyncRequest;
use serde::Serialize;

/// Decodes a sync request body.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyBody`] for an empty or blank body and
/// [`ProtocolError::Malformed`] for anything that is not a valid request.
pub fn decode_request(body: &[u8]) -> ProtocolResult<SyncRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProtocolError::EmptyBody);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Encodes a message as compact JSON.
pub fn encode<T: Serialize>(message: &T) -> ProtocolResult<Vec<u8>> {
    Ok(serde_json::to_vec(message)?)
}

/// Encodes a message as indented JSON.
pub fn encode_pretty<T: Serialize>(message: &T) -> ProtocolResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(message)?)
}
