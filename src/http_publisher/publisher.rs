//! Public publisher type exported by the crate.

use std::fmt;

use crate::error::PublishError;
use crate::message::GelfMessage;

use super::{
    channel::{ChannelManager, DeliveryOutcome},
    config::PublisherConfig,
    serialise::serialise_json,
    transport::{Transport, UreqTransport},
    validate::validate_and_stamp,
};

/// Publishes GELF messages to a collector with one HTTP POST per call.
///
/// Each publish validates the message, stamps the protocol version,
/// serialises it to JSON and performs a single blocking exchange. The
/// outcome of the latest attempt is available through
/// [`last_outcome`](Self::last_outcome), [`transport_error`](Self::transport_error)
/// and [`http_error`](Self::http_error).
///
/// Publishing takes `&mut self`; share a publisher between threads with
/// [`SharedPublisher`](super::SharedPublisher).
pub struct GelfHttpPublisher<T: Transport = UreqTransport> {
    channel: ChannelManager<T>,
}

impl GelfHttpPublisher<UreqTransport> {
    /// Construct a publisher for `hostname:port` over plain HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be initialised.
    pub fn new(hostname: impl Into<String>, port: u16) -> std::io::Result<Self> {
        Self::with_config(PublisherConfig {
            port,
            ..PublisherConfig::new(hostname)
        })
    }

    /// Construct the publisher from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector cannot be initialised.
    pub fn with_config(config: PublisherConfig) -> std::io::Result<Self> {
        Ok(Self {
            channel: ChannelManager::open(&config)?,
        })
    }
}

impl<T: Transport> GelfHttpPublisher<T> {
    /// Construct a publisher that drives `transport` for every exchange.
    pub fn with_transport(config: &PublisherConfig, transport: T) -> Self {
        Self {
            channel: ChannelManager::new(config, transport),
        }
    }

    /// Publish `message` once.
    ///
    /// On success the message's version has been set to
    /// [`GELF_PROTOCOL_VERSION`](super::GELF_PROTOCOL_VERSION). Returns
    /// `Ok(true)` when the collector answered 200 and `Ok(false)` on a
    /// transport or protocol failure; inspect [`transport_error`](Self::transport_error)
    /// or [`http_error`](Self::http_error) to tell them apart.
    ///
    /// # Errors
    ///
    /// * [`PublishError::Validation`] - `short_message` or `host` is missing;
    ///   no I/O was attempted.
    /// * [`PublishError::Serialise`] - the message could not be encoded.
    /// * [`PublishError::Closed`] - the publisher has been closed.
    pub fn publish(&mut self, message: &mut GelfMessage) -> Result<bool, PublishError> {
        validate_and_stamp(message)?;
        let payload = serialise_json(message)?;
        let outcome = self.channel.send(&payload)?;
        Ok(outcome.is_success())
    }

    /// Outcome of the latest publish that reached the transport.
    pub fn last_outcome(&self) -> Option<&DeliveryOutcome> {
        self.channel.last_outcome()
    }

    /// Description of the latest transport failure, if the last attempt
    /// ended in one.
    pub fn transport_error(&self) -> Option<&str> {
        self.last_outcome().and_then(DeliveryOutcome::transport_error)
    }

    /// Status code of the latest non-200 response, if the last attempt
    /// ended in one.
    pub fn http_error(&self) -> Option<u16> {
        self.last_outcome().and_then(DeliveryOutcome::http_error)
    }

    /// Destination URL.
    pub fn url(&self) -> &str {
        self.channel.url()
    }

    /// Borrow the transport, e.g. to inspect a test double.
    pub fn transport(&self) -> Option<&T> {
        self.channel.transport()
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    /// Release the channel. Later publishes fail with [`PublishError::Closed`].
    pub fn close(&mut self) {
        self.channel.close();
    }
}

impl<T: Transport> fmt::Debug for GelfHttpPublisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GelfHttpPublisher")
            .field("channel", &self.channel)
            .finish()
    }
}
