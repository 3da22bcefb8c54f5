//! Transport double replaying scripted replies and recording each exchange.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use gelf_publisher::{Exchange, Transport, TransportError};

#[derive(Clone, Debug)]
pub enum Reply {
    Status(u16),
    Fail(&'static str),
}

#[derive(Clone, Debug)]
pub struct SentRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl SentRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Replies are consumed in order; the last one repeats once the script runs out.
#[derive(Clone, Debug)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Reply>>>,
    sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into_iter().collect())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new([reply])
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().len()
    }

    fn next_reply(&self) -> Reply {
        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().expect("non-empty script")
        } else {
            script.front().cloned().unwrap_or(Reply::Status(200))
        }
    }
}

impl Transport for ScriptedTransport {
    fn post(&mut self, exchange: &Exchange<'_>) -> Result<u16, TransportError> {
        self.sent.lock().push(SentRequest {
            url: exchange.url.to_owned(),
            headers: exchange
                .headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
            body: serde_json::from_slice(exchange.body).expect("JSON body"),
        });
        match self.next_reply() {
            Reply::Status(status) => Ok(status),
            Reply::Fail(description) => Err(TransportError::new(description)),
        }
    }
}
