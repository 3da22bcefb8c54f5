//! GELF publisher over HTTP.
//!
//! This module defines [`GelfHttpPublisher`], which validates
//! [`GelfMessage`](crate::message::GelfMessage) values, stamps the protocol
//! version, serialises them to JSON and POSTs them to
//! `{scheme}://{host}:{port}/gelf`. Each publish performs exactly one
//! blocking exchange; retries and batching are left to the caller.
//!
//! # Outcome Classification
//!
//! - **200**: Success.
//! - **Any other status**: Protocol failure, carrying the status code.
//! - **No status** (DNS, connect, reset, timeout, malformed response):
//!   Transport failure, carrying a description.
//!
//! Missing `host` or `short_message` is rejected before any I/O.

mod channel;
mod config;
mod publisher;
mod record;
mod serialise;
mod shared;
mod transport;
mod validate;


pub use channel::{ChannelManager, DeliveryOutcome, HTTP_OK};
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_WARN_INTERVAL,
    GELF_PATH, PublisherConfig, Scheme,
};
pub use publisher::GelfHttpPublisher;
pub use serialise::serialise_json;
pub use shared::SharedPublisher;
pub use transport::{Exchange, TlsOptions, Transport, TransportError, UreqTransport};
pub use validate::{GELF_PROTOCOL_VERSION, validate, validate_and_stamp};
