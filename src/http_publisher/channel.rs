//! Channel owning the transport handle for one collector URL.
//!
//! The destination and transport options are fixed when the channel is
//! created. Each [`ChannelManager::send`] replaces only the body and the
//! content headers, and performs exactly one exchange.

use std::fmt;

use log::{debug, warn};

use crate::error::PublishError;
use crate::rate_limited_warner::RateLimitedWarner;

use super::config::PublisherConfig;
use super::transport::{Exchange, Transport, TransportError, UreqTransport};

/// The only status code treated as a successful delivery.
pub const HTTP_OK: u16 = 200;

/// Result of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The collector answered 200.
    Success,
    /// No status was obtained; carries a description of the failure.
    TransportFailure(String),
    /// The collector answered with a status other than 200.
    ProtocolFailure(u16),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Description of a transport failure.
    pub fn transport_error(&self) -> Option<&str> {
        match self {
            Self::TransportFailure(description) => Some(description),
            _ => None,
        }
    }

    /// Status code of a protocol failure.
    pub fn http_error(&self) -> Option<u16> {
        match self {
            Self::ProtocolFailure(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("delivered"),
            Self::TransportFailure(description) => write!(f, "transport failure: {description}"),
            Self::ProtocolFailure(status) => write!(f, "collector returned HTTP {status}"),
        }
    }
}

/// Maps a transport result onto a [`DeliveryOutcome`].
pub(crate) fn classify(result: Result<u16, TransportError>) -> DeliveryOutcome {
    match result {
        Ok(HTTP_OK) => DeliveryOutcome::Success,
        Ok(status) => DeliveryOutcome::ProtocolFailure(status),
        Err(TransportError(description)) if description.is_empty() => {
            DeliveryOutcome::TransportFailure("unknown transport failure".into())
        }
        Err(TransportError(description)) => DeliveryOutcome::TransportFailure(description),
    }
}

/// Owns a [`Transport`] bound to a single destination URL.
pub struct ChannelManager<T: Transport = UreqTransport> {
    url: String,
    transport: Option<T>,
    outcome: Option<DeliveryOutcome>,
    warner: RateLimitedWarner,
}

impl ChannelManager<UreqTransport> {
    /// Open a `ureq`-backed channel for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector cannot be initialised.
    pub fn open(config: &PublisherConfig) -> std::io::Result<Self> {
        let transport = UreqTransport::new(config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> ChannelManager<T> {
    /// Bind `transport` to the URL described by `config`.
    pub fn new(config: &PublisherConfig, transport: T) -> Self {
        Self {
            url: config.url(),
            transport: Some(transport),
            outcome: None,
            warner: RateLimitedWarner::new(config.warn_interval),
        }
    }

    /// Destination URL, fixed for the channel's lifetime.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Outcome of the most recent [`send`](Self::send), if one completed.
    pub fn last_outcome(&self) -> Option<&DeliveryOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Borrow the transport, e.g. to inspect a test double.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// POST `payload` to the collector once.
    ///
    /// The previous outcome is cleared before the attempt. Delivery failures
    /// are recorded in the returned outcome rather than raised.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Closed`] if the channel has been closed.
    pub fn send(&mut self, payload: &[u8]) -> Result<&DeliveryOutcome, PublishError> {
        self.outcome = None;
        let Some(transport) = self.transport.as_mut() else {
            return Err(PublishError::Closed);
        };
        let headers = [
            ("Content-Type", "application/json".to_string()),
            ("Content-Length", payload.len().to_string()),
            ("Accept-Encoding", "gzip".to_string()),
        ];
        let exchange = Exchange {
            url: &self.url,
            headers: &headers,
            body: payload,
        };
        let outcome = classify(transport.post(&exchange));
        self.report(&outcome);
        Ok(self.outcome.insert(outcome))
    }

    fn report(&self, outcome: &DeliveryOutcome) {
        if outcome.is_success() {
            debug!("GelfHttpPublisher delivered message to {}", self.url);
            return;
        }
        debug!("GelfHttpPublisher delivery to {} failed: {outcome}", self.url);
        self.warner.record_failure();
        self.warner.warn_if_due(|count| {
            warn!(
                "GelfHttpPublisher: {count} deliveries to {} failed; last: {outcome}",
                self.url
            );
        });
    }

    /// Release the transport. Later sends fail with [`PublishError::Closed`].
    pub fn close(&mut self) {
        if self.transport.take().is_none() {
            return;
        }
        self.warner.flush(|count| {
            warn!(
                "GelfHttpPublisher: {count} deliveries to {} failed before close",
                self.url
            );
        });
    }
}

impl<T: Transport> Drop for ChannelManager<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Transport> fmt::Debug for ChannelManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelManager")
            .field("url", &self.url)
            .field("closed", &self.is_closed())
            .field("outcome", &self.outcome)
            .finish()
    }
}
