//! Subscriber registry
//!
//! Maps a subscriber key (the author name a client follows) to the bounded
//! queue feeding that client's stream. At most one live subscription exists
//! per key.
//!
//! Concurrency notes:
//! - The map sits behind a single `std::sync::Mutex`. The lock is held only
//!   to insert, remove or clone a sender; enqueueing happens after release.
//! - Each subscription spawns a watcher task that waits on its cancellation
//!   token and then removes the entry. Entries carry a generation id so a
//!   late watcher never removes a newer subscription under the same key.
//! - Delivery uses `try_send`: a full queue drops the message for that one
//!   subscriber and never stalls the publisher.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broker::message::Message;
use crate::utils::{Error, Result};

pub type SubscriberKey = String;

/// Queue size used when no configuration overrides it.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2;

#[derive(Debug)]
struct SubscriptionEntry {
    generation: u64,
    sender: mpsc::Sender<Arc<Message>>,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<SubscriberKey, SubscriptionEntry>>,
    next_generation: AtomicU64,
}

/// Outcome of a single [`SubscriberRegistry::deliver`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message was queued for the subscriber.
    Queued,
    /// The subscriber's queue was full; the message was dropped.
    Dropped,
    /// No live subscription for the key.
    NoSubscriber,
}

/// Concurrent map from subscriber key to delivery queue.
///
/// Cloning is cheap and every clone sees the same entries.
#[derive(Debug, Clone)]
pub struct SubscriberRegistry {
    inner: Arc<Inner>,
    queue_capacity: usize,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl SubscriberRegistry {
    /// Create an empty registry whose queues hold `queue_capacity` messages.
    /// A capacity of zero is raised to one.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<SubscriberKey, SubscriptionEntry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscription for `key`, scoped to `cancel`.
    ///
    /// Fails with [`Error::AlreadySubscribed`] if `key` is live. Must be
    /// called from within a Tokio runtime, since it spawns the watcher task
    /// that removes the entry once `cancel` fires.
    pub fn subscribe(&self, key: &str, cancel: CancellationToken) -> Result<Subscription> {
        if key.is_empty() {
            return Err(Error::InvalidUser);
        }

        let token = cancel.child_token();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut entries = self.entries();
            if entries.contains_key(key) {
                let err = Error::AlreadySubscribed(key.to_string());
                warn!("{err}");
                return Err(err);
            }
            entries.insert(
                key.to_string(),
                SubscriptionEntry {
                    generation,
                    sender,
                    token: token.clone(),
                },
            );
        }
        info!("`{key}` has been subscribed!");

        let registry = self.clone();
        let watched_key = key.to_string();
        let watched = token.clone();
        tokio::spawn(async move {
            watched.cancelled().await;
            if registry.remove_generation(&watched_key, generation) {
                info!("`{watched_key}` has been unsubscribed.");
            }
        });

        Ok(Subscription {
            key: key.to_string(),
            generation,
            receiver,
            token,
            registry: self.clone(),
        })
    }

    /// Queue `message` for the subscriber registered under `key`.
    ///
    /// Never blocks and never fails: a full or closed queue drops the
    /// message, and an absent key is a no-op.
    pub fn deliver(&self, key: &str, message: Arc<Message>) -> Delivery {
        let sender = match self.entries().get(key) {
            Some(entry) => entry.sender.clone(),
            None => {
                debug!("No subscriber for `{key}`, skipping message {}", message.id);
                return Delivery::NoSubscriber;
            }
        };

        match sender.try_send(message) {
            Ok(()) => Delivery::Queued,
            Err(mpsc::error::TrySendError::Full(msg)) => {
                warn!("Queue for `{key}` is full, dropped message {}", msg.id);
                Delivery::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(msg)) => {
                debug!("Queue for `{key}` is closed, dropped message {}", msg.id);
                Delivery::Dropped
            }
        }
    }

    /// Remove the subscription for `key`, if any, whoever owns it. Its
    /// stream ends and its watcher task exits.
    pub fn unsubscribe(&self, key: &str) {
        let removed = self.entries().remove(key);
        if let Some(entry) = removed {
            entry.token.cancel();
            info!("`{key}` has been unsubscribed.");
        }
    }

    pub fn is_subscribed(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Snapshot of the live keys, sorted.
    pub fn keys(&self) -> Vec<SubscriberKey> {
        let mut keys: Vec<_> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn remove_generation(&self, key: &str, generation: u64) -> bool {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.generation == generation => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }
}

/// The consumer side of one registration.
///
/// Yields messages in the order they were queued until the subscription is
/// cancelled. Anything still buffered at that point is abandoned. Dropping
/// the subscription cancels it.
#[derive(Debug)]
pub struct Subscription {
    key: SubscriberKey,
    generation: u64,
    receiver: mpsc::Receiver<Arc<Message>>,
    token: CancellationToken,
    registry: SubscriberRegistry,
}

impl Subscription {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// End this registration now.
    ///
    /// Only the entry this subscription created is removed, so the key is
    /// free again on return. A newer subscription under the same key, left
    /// behind after an explicit [`SubscriberRegistry::unsubscribe`], is not
    /// touched.
    pub fn unsubscribe(self) {
        if self.registry.remove_generation(&self.key, self.generation) {
            info!("`{}` has been unsubscribed.", self.key);
        }
        // Drop cancels the token and stops the watcher
    }

    /// Wait for the next message, or `None` once cancelled.
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            msg = self.receiver.recv() => msg,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // dropping the stream ends the registration like a disconnect would
        self.token.cancel();
    }
}

impl Stream for Subscription {
    type Item = Arc<Message>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.token.is_cancelled() {
            return Poll::Ready(None);
        }
        match this.receiver.poll_recv(cx) {
            // the sender is dropped when the entry is removed, which wakes us
            Poll::Ready(Some(_)) if this.token.is_cancelled() => Poll::Ready(None),
            other => other,
        }
    }
}
