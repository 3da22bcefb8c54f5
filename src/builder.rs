//! Builder for [`GelfHttpPublisher`](crate::http_publisher::GelfHttpPublisher).
//!
//! Exposes the collector address, scheme, timeouts and TLS options, and
//! validates them before any transport is created.

use std::{io, net::Ipv6Addr, time::Duration};

use thiserror::Error;

use crate::http_publisher::{
    GelfHttpPublisher, PublisherConfig, Scheme, SharedPublisher, TlsOptions, Transport,
};

/// Errors that may occur while building a publisher.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid user supplied configuration.
    #[error("invalid publisher configuration: {0}")]
    InvalidConfig(String),
    /// Underlying I/O error whilst creating the transport.
    #[error(transparent)]
    Io(#[from] io::Error),
}

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(BuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

fn is_ipv6_literal(hostname: &str) -> bool {
    let bare = hostname
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(hostname);
    bare.parse::<Ipv6Addr>().is_ok()
}

/// Builder for constructing [`GelfHttpPublisher`] instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PublisherBuilder {
    hostname: Option<String>,
    port: Option<u16>,
    scheme: Option<Scheme>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    warn_interval_ms: Option<u64>,
    tls: Option<TlsOptions>,
}

impl PublisherBuilder {
    /// Create a new builder with no hostname configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collector hostname (required).
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Use HTTPS, optionally skipping certificate validation.
    pub fn with_tls(mut self, insecure_skip_verify: bool) -> Self {
        self.scheme = Some(Scheme::Https);
        self.tls = Some(TlsOptions {
            insecure_skip_verify,
        });
        self
    }

    option_setter!(
        #[doc = "Set the collector port. Defaults to 12201."]
        with_port,
        port,
        u16
    );
    option_setter!(
        #[doc = "Set the URL scheme. Defaults to `http`."]
        with_scheme,
        scheme,
        Scheme
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the request timeout in milliseconds."]
        with_request_timeout_ms,
        request_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the minimum interval between failure warnings in milliseconds."]
        with_warn_interval_ms,
        warn_interval_ms,
        u64
    );

    fn validate(&self) -> Result<(), BuildError> {
        self.validate_hostname()?;
        self.validate_port()?;
        self.validate_timeouts()?;
        self.validate_tls()?;
        Ok(())
    }

    fn validate_hostname(&self) -> Result<(), BuildError> {
        match &self.hostname {
            None => Err(BuildError::InvalidConfig(
                "GELF publisher requires a hostname".into(),
            )),
            Some(hostname) if hostname.trim().is_empty() => Err(BuildError::InvalidConfig(
                "hostname must not be empty".into(),
            )),
            Some(hostname) if hostname.contains('/') => Err(BuildError::InvalidConfig(format!(
                "hostname must not contain a path: {hostname}"
            ))),
            Some(hostname) if hostname.contains(':') && !is_ipv6_literal(hostname.trim()) => {
                Err(BuildError::InvalidConfig(format!(
                    "hostname must not contain a port, use with_port instead: {hostname}"
                )))
            }
            _ => Ok(()),
        }
    }

    fn validate_port(&self) -> Result<(), BuildError> {
        if let Some(port) = self.port {
            ensure_positive!(port, "port")?;
        }
        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), BuildError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.request_timeout_ms {
            ensure_positive!(timeout, "request_timeout_ms")?;
        }
        Ok(())
    }

    fn validate_tls(&self) -> Result<(), BuildError> {
        if self.tls.is_some() && self.scheme == Some(Scheme::Http) {
            return Err(BuildError::InvalidConfig(
                "TLS options require the https scheme".into(),
            ));
        }
        Ok(())
    }

    /// Validate the builder and produce a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidConfig`] for a missing hostname, a zero
    /// port or timeout, or TLS options paired with plain HTTP.
    pub fn build_config(&self) -> Result<PublisherConfig, BuildError> {
        self.validate()?;

        let defaults = PublisherConfig::default();
        Ok(PublisherConfig {
            hostname: self.hostname.clone().unwrap_or(defaults.hostname).trim().to_owned(),
            port: self.port.unwrap_or(defaults.port),
            scheme: self.scheme.unwrap_or(defaults.scheme),
            connect_timeout: self
                .connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            request_timeout: self
                .request_timeout_ms
                .map_or(defaults.request_timeout, Duration::from_millis),
            tls: self.tls.clone(),
            warn_interval: self
                .warn_interval_ms
                .map_or(defaults.warn_interval, Duration::from_millis),
        })
    }

    /// Build a `ureq`-backed publisher.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if validation fails or the transport cannot be
    /// initialised.
    pub fn build(&self) -> Result<GelfHttpPublisher, BuildError> {
        let config = self.build_config()?;
        Ok(GelfHttpPublisher::with_config(config)?)
    }

    /// Build a publisher that drives `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidConfig`] if validation fails.
    pub fn build_with_transport<T: Transport>(
        &self,
        transport: T,
    ) -> Result<GelfHttpPublisher<T>, BuildError> {
        let config = self.build_config()?;
        Ok(GelfHttpPublisher::with_transport(&config, transport))
    }

    /// Build a `ureq`-backed publisher wrapped for use from several threads.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_shared(&self) -> Result<SharedPublisher, BuildError> {
        self.build().map(SharedPublisher::new)
    }
}
