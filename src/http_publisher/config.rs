//! Configuration structures consumed by the HTTP publisher lifecycle.
//!
//! `PublisherBuilder` constructs these values before passing them to
//! [`GelfHttpPublisher`](super::GelfHttpPublisher) for runtime use.

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::time::Duration;

use super::transport::TlsOptions;

/// Port Graylog listens on for GELF HTTP input unless configured otherwise.
pub const DEFAULT_PORT: u16 = 12201;
/// Default connection timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default timeout for a whole request/response exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default interval between rate-limited failure warnings.
pub const DEFAULT_WARN_INTERVAL: Duration = Duration::from_secs(5);
/// Path the collector serves GELF HTTP input on.
pub const GELF_PATH: &str = "/gelf";

/// URL scheme used to reach the collector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unsupported scheme: {other}")),
        }
    }
}

/// Configuration object describing how to construct a
/// [`GelfHttpPublisher`](super::GelfHttpPublisher).
#[derive(Clone, Debug, PartialEq)]
pub struct PublisherConfig {
    /// Collector hostname or IP address.
    pub hostname: String,
    /// Collector port.
    pub port: u16,
    /// URL scheme.
    pub scheme: Scheme,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
    /// Timeout for the full request/response exchange.
    pub request_timeout: Duration,
    /// TLS settings, used only with [`Scheme::Https`].
    pub tls: Option<TlsOptions>,
    /// Interval between rate-limited failure warnings.
    pub warn_interval: Duration,
}

impl PublisherConfig {
    /// Configuration for `hostname` with every other setting at its default.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// Destination URL: `{scheme}://{hostname}:{port}/gelf`.
    ///
    /// IPv6 literals are bracketed.
    pub fn url(&self) -> String {
        let host = if self.hostname.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.hostname)
        } else {
            self.hostname.clone()
        };
        format!("{}://{}:{}{}", self.scheme, host, self.port, GELF_PATH)
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".into(),
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tls: None,
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}
