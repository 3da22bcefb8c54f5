//! Pre-send checks and protocol stamping.

use crate::error::ValidationError;
use crate::message::GelfMessage;

/// GELF protocol version written into every published message.
pub const GELF_PROTOCOL_VERSION: &str = "1.1";

fn is_missing(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// Reject messages without a `short_message` or `host`.
///
/// Only absent or empty values count as missing; whitespace is content.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming the first missing field.
pub fn validate(message: &GelfMessage) -> Result<(), ValidationError> {
    if is_missing(message.short_message()) {
        return Err(ValidationError::MissingField("short_message"));
    }
    if is_missing(message.host()) {
        return Err(ValidationError::MissingField("host"));
    }
    Ok(())
}

/// Validate `message`, then overwrite its version with
/// [`GELF_PROTOCOL_VERSION`]. Nothing else is modified.
///
/// # Errors
///
/// Returns [`ValidationError`] without touching the message if validation
/// fails.
pub fn validate_and_stamp(message: &mut GelfMessage) -> Result<(), ValidationError> {
    validate(message)?;
    message.set_version(GELF_PROTOCOL_VERSION);
    Ok(())
}
