//! A transport double that records every exchange for test assertions.
//!
//! Clones share the same request log, so a test can keep one handle while
//! the publisher owns another.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::http_publisher::{Exchange, Transport, TransportError};

/// Canned reply returned for every exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Status(u16),
    Fail(String),
}

/// Owned copy of an [`Exchange`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Debug)]
pub struct RecordingTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_reply(&mut self, reply: Reply) {
        self.reply = reply;
    }

    /// Snapshot of every exchange seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for RecordingTransport {
    fn post(&mut self, exchange: &Exchange<'_>) -> Result<u16, TransportError> {
        self.requests.lock().push(RecordedRequest {
            url: exchange.url.to_owned(),
            headers: exchange
                .headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
            body: exchange.body.to_vec(),
        });
        match &self.reply {
            Reply::Status(status) => Ok(*status),
            Reply::Fail(description) => Err(TransportError::new(description.clone())),
        }
    }
}
