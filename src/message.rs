//! GELF message representation.
//!
//! [`GelfMessage`] holds the standard GELF fields plus any number of
//! additional fields. Additional field names always carry the `_` prefix the
//! protocol requires; setters add it when callers omit it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::level::GelfLevel;

/// Additional field name the protocol reserves for the collector.
const RESERVED_ID_FIELD: &str = "_id";

/// Errors raised when setting an additional field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The name is empty or contains characters outside `[A-Za-z0-9_.-]`.
    #[error("invalid additional field name: {0:?}")]
    InvalidName(String),
    /// `_id` is assigned by the collector and cannot be sent.
    #[error("additional field name {0:?} is reserved")]
    Reserved(String),
}

/// A single GELF event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GelfMessage {
    /// Protocol version. Overwritten by the publisher before every send.
    pub(crate) version: Option<String>,
    /// Name of the host, source or application that sent the message.
    pub(crate) host: Option<String>,
    /// Short descriptive message.
    pub(crate) short_message: Option<String>,
    /// Long message, e.g. a backtrace.
    pub(crate) full_message: Option<String>,
    /// Seconds since the UNIX epoch, with optional fractional milliseconds.
    pub(crate) timestamp: Option<f64>,
    /// Syslog severity.
    pub(crate) level: Option<GelfLevel>,
    /// Additional fields keyed by their `_`-prefixed name.
    pub(crate) additional: BTreeMap<String, Value>,
}

impl GelfMessage {
    /// Construct a message with the two fields every publish requires.
    pub fn new(host: impl Into<String>, short_message: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            short_message: Some(short_message.into()),
            ..Self::default()
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn short_message(&self) -> Option<&str> {
        self.short_message.as_deref()
    }

    pub fn full_message(&self) -> Option<&str> {
        self.full_message.as_deref()
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    pub fn level(&self) -> Option<GelfLevel> {
        self.level
    }

    /// Set the version field. Publishers replace this with their own
    /// protocol version, so it only matters for messages serialised by hand.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    pub fn set_short_message(&mut self, short_message: impl Into<String>) {
        self.short_message = Some(short_message.into());
    }

    pub fn set_full_message(&mut self, full_message: impl Into<String>) {
        self.full_message = Some(full_message.into());
    }

    /// Set the timestamp in seconds since the UNIX epoch. NaN and infinite
    /// values are left off the wire.
    pub fn set_timestamp(&mut self, seconds: f64) {
        self.timestamp = Some(seconds);
    }

    /// Set the timestamp from a UTC date, keeping millisecond precision.
    pub fn set_timestamp_from(&mut self, at: DateTime<Utc>) {
        self.timestamp = Some(at.timestamp_millis() as f64 / 1000.0);
    }

    /// Stamp the message with the current wall-clock time.
    pub fn stamp_now(&mut self) {
        self.set_timestamp_from(Utc::now());
    }

    pub fn set_level(&mut self, level: GelfLevel) {
        self.level = Some(level);
    }

    /// Chainable form of [`set_full_message`](Self::set_full_message).
    pub fn with_full_message(mut self, full_message: impl Into<String>) -> Self {
        self.set_full_message(full_message);
        self
    }

    /// Chainable form of [`set_level`](Self::set_level).
    pub fn with_level(mut self, level: GelfLevel) -> Self {
        self.set_level(level);
        self
    }

    /// Chainable form of [`set_timestamp`](Self::set_timestamp).
    pub fn with_timestamp(mut self, seconds: f64) -> Self {
        self.set_timestamp(seconds);
        self
    }

    /// Set an additional field, adding the `_` prefix when `name` lacks it.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the name is not a valid GELF field name or
    /// is the reserved `_id`.
    pub fn set_additional(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), FieldError> {
        let key = additional_key(name)?;
        self.additional.insert(key, value.into());
        Ok(())
    }

    /// Look up an additional field with or without its `_` prefix.
    pub fn additional(&self, name: &str) -> Option<&Value> {
        match name.strip_prefix('_') {
            Some(_) => self.additional.get(name),
            None => self.additional.get(&format!("_{name}")),
        }
    }

    /// Remove an additional field, returning its previous value.
    pub fn remove_additional(&mut self, name: &str) -> Option<Value> {
        if name.starts_with('_') {
            self.additional.remove(name)
        } else {
            self.additional.remove(&format!("_{name}"))
        }
    }

    /// Iterate over additional fields in name order.
    pub fn additional_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.additional.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up any field by its wire name.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "version" => self.version.clone().map(Value::from),
            "host" => self.host.clone().map(Value::from),
            "short_message" => self.short_message.clone().map(Value::from),
            "full_message" => self.full_message.clone().map(Value::from),
            "timestamp" => self.timestamp.map(Value::from),
            "level" => self.level.map(|level| Value::from(level.as_u8())),
            other => self.additional(other).cloned(),
        }
    }

    /// Export every present field as a JSON object keyed by wire name.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for name in ["version", "host", "short_message", "full_message", "timestamp", "level"] {
            if let Some(value) = self.field(name) {
                fields.insert(name.to_owned(), value);
            }
        }
        for (k, v) in &self.additional {
            fields.insert(k.clone(), v.clone());
        }
        fields
    }
}

impl fmt::Display for GelfMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.host.as_deref().unwrap_or("-"),
            self.short_message.as_deref().unwrap_or("")
        )
    }
}

fn additional_key(name: &str) -> Result<String, FieldError> {
    let key = if name.starts_with('_') {
        name.to_owned()
    } else {
        format!("_{name}")
    };
    let valid = key.len() > 1
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid {
        return Err(FieldError::InvalidName(name.to_owned()));
    }
    if key == RESERVED_ID_FIELD {
        return Err(FieldError::Reserved(key));
    }
    Ok(key)
}
