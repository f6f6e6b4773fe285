//! Opaque offset cursors.
//!
//! A cursor is the standard base64 encoding of the decimal representation of a
//! zero-based offset into a collection.
use crate::{GraphqlError, GraphqlResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::warn;

/// Encode an offset into a cursor.
pub fn encode_cursor(offset: u64) -> String {
    BASE64.encode(offset.to_string())
}

/// Decode a cursor back into an offset.
///
/// Empty strings, invalid base64 and payloads that are not a non-negative
/// decimal integer are rejected.
pub fn decode_cursor(cursor: &str) -> GraphqlResult<u64> {
    let invalid = || {
        warn!("Rejecting invalid cursor {cursor:?}");
        GraphqlError::InvalidCursor(cursor.to_string())
    };

    if cursor.is_empty() {
        return Err(invalid());
    }

    let bytes = BASE64.decode(cursor).map_err(|_| invalid())?;
    let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;

    if decoded.is_empty() || !decoded.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    decoded.parse::<u64>().map_err(|_| invalid())
}
