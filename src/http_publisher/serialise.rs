//! JSON serialisation of GELF messages.
//!
//! Payloads are plain UTF-8 JSON. Compression is left to the transport's
//! content negotiation and never applied to the request body.

use super::record::GelfWireRecord;
use crate::message::GelfMessage;

/// Serialise `message` into a JSON object keyed by GELF field name.
///
/// Absent optional fields are omitted, as are non-finite timestamps.
///
/// # Errors
///
/// Returns an error if serialisation of an additional field fails.
pub fn serialise_json(message: &GelfMessage) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&GelfWireRecord::from(message))
}
