//! INI configuration for publishers.
//!
//! Settings live in a `[gelf]` section:
//!
//! ```ini
//! [gelf]
//! hostname = graylog.internal
//! port = 12201
//! scheme = https
//! connect_timeout_ms = 2000
//! request_timeout_ms = 10000
//! warn_interval_ms = 5000
//! insecure_skip_verify = false
//! ```
//!
//! Only `hostname` is required. Parsing yields a [`PublisherBuilder`], so the
//! usual builder validation still applies.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::builder::PublisherBuilder;
use crate::http_publisher::Scheme;

/// Section holding publisher settings.
pub const GELF_SECTION: &str = "gelf";

/// Errors raised while loading INI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} doesn't exist")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("configuration is invalid: {0}")]
    Invalid(String),
    #[error("configuration has no [gelf] section")]
    MissingSection,
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Load publisher settings from the INI file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_publisher_config(path: impl AsRef<Path>) -> Result<PublisherBuilder, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
        _ => ConfigError::Io {
            path: path.display().to_string(),
            source: err,
        },
    })?;
    parse_publisher_config(&text)
}

/// Parse publisher settings from INI text.
///
/// # Errors
///
/// Returns [`ConfigError`] for malformed INI, a missing `[gelf]` section or
/// values of the wrong type.
pub fn parse_publisher_config(text: &str) -> Result<PublisherBuilder, ConfigError> {
    let ini = Ini::load_from_str(text).map_err(|err| ConfigError::Invalid(err.to_string()))?;
    let section = ini
        .section(Some(GELF_SECTION))
        .ok_or(ConfigError::MissingSection)?;

    let mut builder = PublisherBuilder::new();
    if let Some(hostname) = section.get("hostname") {
        builder = builder.with_hostname(hostname);
    }
    if let Some(port) = parse_value::<u16>(section, "port")? {
        builder = builder.with_port(port);
    }
    if let Some(ms) = parse_value::<u64>(section, "connect_timeout_ms")? {
        builder = builder.with_connect_timeout_ms(ms);
    }
    if let Some(ms) = parse_value::<u64>(section, "request_timeout_ms")? {
        builder = builder.with_request_timeout_ms(ms);
    }
    if let Some(ms) = parse_value::<u64>(section, "warn_interval_ms")? {
        builder = builder.with_warn_interval_ms(ms);
    }
    let scheme = parse_value::<Scheme>(section, "scheme")?;
    let insecure = parse_value::<bool>(section, "insecure_skip_verify")?.unwrap_or(false);
    if insecure || scheme == Some(Scheme::Https) {
        builder = builder.with_tls(insecure);
    }
    // An explicit `scheme = http` next to `insecure_skip_verify = true` is
    // left for builder validation to reject.
    if let Some(scheme) = scheme {
        builder = builder.with_scheme(scheme);
    }
    Ok(builder)
}

fn parse_value<T: FromStr>(
    section: &Properties,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    section
        .get(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key,
                value: raw.to_owned(),
            })
        })
        .transpose()
}
