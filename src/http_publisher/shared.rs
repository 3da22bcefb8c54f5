//! Mutex-guarded publisher for callers publishing from several threads.

use parking_lot::Mutex;

use crate::error::PublishError;
use crate::message::GelfMessage;

use super::{
    channel::DeliveryOutcome,
    publisher::GelfHttpPublisher,
    transport::{Transport, UreqTransport},
};

/// A [`GelfHttpPublisher`] that can be shared by reference across threads.
///
/// Publishes are serialised by a mutex. Each call returns the outcome of its
/// own attempt, so callers never observe another thread's error state.
#[derive(Debug)]
pub struct SharedPublisher<T: Transport = UreqTransport> {
    inner: Mutex<GelfHttpPublisher<T>>,
}

impl<T: Transport> SharedPublisher<T> {
    pub fn new(publisher: GelfHttpPublisher<T>) -> Self {
        Self {
            inner: Mutex::new(publisher),
        }
    }

    /// Publish `message` while holding the lock.
    ///
    /// # Errors
    ///
    /// Same as [`GelfHttpPublisher::publish`].
    pub fn publish(&self, message: &mut GelfMessage) -> Result<DeliveryOutcome, PublishError> {
        let mut publisher = self.inner.lock();
        publisher.publish(message)?;
        publisher
            .last_outcome()
            .cloned()
            .ok_or(PublishError::Closed)
    }

    /// Run `f` with exclusive access to the wrapped publisher.
    pub fn with_publisher<R>(&self, f: impl FnOnce(&mut GelfHttpPublisher<T>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Close the wrapped publisher.
    pub fn close(&self) {
        self.inner.lock().close();
    }

    pub fn into_inner(self) -> GelfHttpPublisher<T> {
        self.inner.into_inner()
    }
}

impl<T: Transport> From<GelfHttpPublisher<T>> for SharedPublisher<T> {
    fn from(publisher: GelfHttpPublisher<T>) -> Self {
        Self::new(publisher)
    }
}
