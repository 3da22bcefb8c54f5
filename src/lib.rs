//! Publish GELF messages to a Graylog-compatible collector over HTTP.
//!
//! ```no_run
//! use gelf_publisher::{GelfLevel, GelfMessage, PublisherBuilder};
//!
//! let mut publisher = PublisherBuilder::new()
//!     .with_hostname("graylog.internal")
//!     .build()?;
//! let mut message = GelfMessage::new("web-1", "disk full").with_level(GelfLevel::Critical);
//! message.set_additional("mount", "/var")?;
//! if !publisher.publish(&mut message)? {
//!     eprintln!("delivery failed: {:?}", publisher.last_outcome());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod error;
pub mod file_config;
pub mod http_publisher;
pub mod level;
pub mod message;
pub mod rate_limited_warner;

#[cfg(test)]
mod test_utils;

pub use builder::{BuildError, PublisherBuilder};
pub use error::{PublishError, ValidationError};
pub use file_config::{ConfigError, load_publisher_config, parse_publisher_config};
pub use http_publisher::{
    ChannelManager, DEFAULT_PORT, DeliveryOutcome, Exchange, GELF_PROTOCOL_VERSION,
    GelfHttpPublisher, PublisherConfig, Scheme, SharedPublisher, TlsOptions, Transport,
    TransportError, UreqTransport,
};
pub use level::{GelfLevel, ParseLevelError};
pub use message::{FieldError, GelfMessage};
