//! Transport primitives for the HTTP publisher.
//!
//! [`Transport`] performs one blocking request/response exchange. The
//! production implementation, [`UreqTransport`], wraps a `ureq::Agent`
//! configured never to pool connections or follow redirects.

use std::{io, sync::Arc};

use native_tls::TlsConnector;
use thiserror::Error;
use ureq::{Agent, AgentBuilder};

use super::config::{PublisherConfig, Scheme};

/// Connection-level failure: DNS, TCP, TLS, timeouts or malformed responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

/// A single POST exchange handed to a [`Transport`].
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// Destination URL.
    pub url: &'a str,
    /// Request headers in send order.
    pub headers: &'a [(&'static str, String)],
    /// Request body.
    pub body: &'a [u8],
}

impl Exchange<'_> {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs blocking HTTP exchanges on behalf of a channel.
pub trait Transport: Send {
    /// POST `exchange` and return the response status code.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no status could be obtained.
    fn post(&mut self, exchange: &Exchange<'_>) -> Result<u16, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&mut self, exchange: &Exchange<'_>) -> Result<u16, TransportError> {
        (**self).post(exchange)
    }
}

/// TLS connection options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// Skip certificate and hostname validation when true (intended for tests).
    pub insecure_skip_verify: bool,
}

impl TlsOptions {
    fn connector(&self) -> io::Result<TlsConnector> {
        let mut builder = TlsConnector::builder();
        if self.insecure_skip_verify {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        builder.build().map_err(io::Error::other)
    }
}

/// [`Transport`] backed by a `ureq` agent.
#[derive(Debug)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Build the agent for `config`.
    ///
    /// Idle connections are never kept, so every exchange opens a fresh
    /// connection and no connection is shared with another destination.
    /// Redirects are returned as-is rather than followed.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector cannot be initialised.
    pub fn new(config: &PublisherConfig) -> io::Result<Self> {
        let mut builder = AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.request_timeout)
            .max_idle_connections(0)
            .max_idle_connections_per_host(0)
            .redirects(0);
        if config.scheme == Scheme::Https {
            let tls = config.tls.clone().unwrap_or_default();
            builder = builder.tls_connector(Arc::new(tls.connector()?));
        }
        Ok(Self {
            agent: builder.build(),
        })
    }
}

impl Transport for UreqTransport {
    fn post(&mut self, exchange: &Exchange<'_>) -> Result<u16, TransportError> {
        let mut req = self.agent.post(exchange.url);
        for (key, value) in exchange.headers {
            req = req.set(key, value);
        }
        match req.send_bytes(exchange.body) {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(err)) => Err(TransportError::new(err.to_string())),
        }
    }
}
