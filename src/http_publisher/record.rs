//! Zero-copy serialisable view of a GELF message.
//!
//! Borrows from the original message so serialisation allocates only the
//! output buffer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

use crate::level::GelfLevel;
use crate::message::GelfMessage;

pub(super) struct GelfWireRecord<'a> {
    pub(super) version: Option<&'a str>,
    pub(super) host: Option<&'a str>,
    pub(super) short_message: Option<&'a str>,
    pub(super) full_message: Option<&'a str>,
    pub(super) timestamp: Option<f64>,
    pub(super) level: Option<GelfLevel>,
    pub(super) additional: &'a BTreeMap<String, Value>,
}

impl GelfWireRecord<'_> {
    fn count_fields(&self) -> usize {
        usize::from(self.version.is_some())
            + usize::from(self.host.is_some())
            + usize::from(self.short_message.is_some())
            + usize::from(self.full_message.is_some())
            + usize::from(self.timestamp.is_some())
            + usize::from(self.level.is_some())
            + self.additional.len()
    }
}

impl<'a> From<&'a GelfMessage> for GelfWireRecord<'a> {
    fn from(message: &'a GelfMessage) -> Self {
        Self {
            version: message.version.as_deref(),
            host: message.host.as_deref(),
            short_message: message.short_message.as_deref(),
            full_message: message.full_message.as_deref(),
            timestamp: message.timestamp.filter(|t| t.is_finite()),
            level: message.level,
            additional: &message.additional,
        }
    }
}

fn serialize_optional<M, T>(map: &mut M, key: &str, value: Option<T>) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize,
{
    match value {
        Some(v) => map.serialize_entry(key, &v),
        None => Ok(()),
    }
}

impl Serialize for GelfWireRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.count_fields()))?;
        serialize_optional(&mut map, "version", self.version)?;
        serialize_optional(&mut map, "host", self.host)?;
        serialize_optional(&mut map, "short_message", self.short_message)?;
        serialize_optional(&mut map, "full_message", self.full_message)?;
        serialize_optional(&mut map, "timestamp", self.timestamp)?;
        serialize_optional(&mut map, "level", self.level)?;
        for (k, v) in self.additional {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
