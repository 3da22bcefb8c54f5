//! Errors surfaced by the publish pipeline.
//!
//! Delivery failures are not errors: they are reported through
//! [`DeliveryOutcome`](crate::DeliveryOutcome). The types here cover the
//! cases where no delivery was attempted.

use thiserror::Error;

/// A message lacks a field the protocol requires.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required GELF field \"{0}\"; \"short_message\" and \"host\" are required")]
    MissingField(&'static str),
}

/// Errors that prevent a publish attempt from reaching the network.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The message failed validation; no I/O was performed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The message could not be encoded as JSON.
    #[error("failed to serialise GELF message: {0}")]
    Serialise(#[from] serde_json::Error),
    /// The publisher was closed and its channel released.
    #[error("publisher is closed")]
    Closed,
}

impl PublishError {
    /// Return the validation failure, if that is what this error is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
