//! Syslog severity levels carried in the GELF `level` field.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Severity of a GELF message, using the syslog numbering (0 is most severe).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GelfLevel {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    #[default]
    Informational = 6,
    Debug = 7,
}

/// Raised when a string or number does not name a syslog severity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown GELF level: {0}")]
pub struct ParseLevelError(pub String);

impl GelfLevel {
    /// Numeric value written to the wire.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Upper-case name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Alert => "ALERT",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Notice => "NOTICE",
            Self::Informational => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Parse `s`, falling back to [`GelfLevel::Informational`] and logging a
    /// warning when the value is not recognised.
    pub fn parse_or_warn(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log::warn!("{err}; defaulting to INFO");
            Self::Informational
        })
    }
}

impl TryFrom<u8> for GelfLevel {
    type Error = ParseLevelError;

    fn try_from(value: u8) -> Result<Self, ParseLevelError> {
        match value {
            0 => Ok(Self::Emergency),
            1 => Ok(Self::Alert),
            2 => Ok(Self::Critical),
            3 => Ok(Self::Error),
            4 => Ok(Self::Warning),
            5 => Ok(Self::Notice),
            6 => Ok(Self::Informational),
            7 => Ok(Self::Debug),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

impl From<GelfLevel> for u8 {
    fn from(level: GelfLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for GelfLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GelfLevel {
    type Err = ParseLevelError;

    /// Accepts level names (case-insensitive, common aliases included) or
    /// the numeric severity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<u8>() {
            return Self::try_from(number);
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "EMERGENCY" | "EMERG" => Ok(Self::Emergency),
            "ALERT" => Ok(Self::Alert),
            "CRITICAL" | "CRIT" => Ok(Self::Critical),
            "ERROR" | "ERR" => Ok(Self::Error),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "NOTICE" => Ok(Self::Notice),
            "INFORMATIONAL" | "INFO" => Ok(Self::Informational),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

impl Serialize for GelfLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}
