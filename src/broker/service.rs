//! Message service
//!
//! Orchestrates the three inbound operations:
//! - `post`: append to the log, broadcast, deliver to the author's subscriber
//! - `list`: read the whole log back
//! - `message_posted`: register a live subscription for one author
//!
//! The append is the durability gate. If it fails nothing is broadcast or
//! delivered. Broadcast and delivery failures never reach the caller.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::broadcast::BroadcastSink;
use crate::broker::message::Message;
use crate::broker::registry::{Delivery, SubscriberRegistry, Subscription};
use crate::persistence::MessageStore;
use crate::utils::{Error, Result};

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    sink: Arc<dyn BroadcastSink>,
    registry: SubscriberRegistry,
}

impl MessageService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        sink: Arc<dyn BroadcastSink>,
        registry: SubscriberRegistry,
    ) -> Self {
        Self {
            store,
            sink,
            registry,
        }
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Persist a new message from `user`, then fan it out.
    pub fn post(&self, user: &str, text: &str) -> Result<Message> {
        if user.is_empty() {
            return Err(Error::InvalidUser);
        }

        let message = Message::new(user, text);

        if let Err(e) = self.store.append(&message) {
            error!(kind = e.as_label(), "Post from `{user}` failed: {e}");
            return Err(match e {
                Error::StoreUnavailable(_) => e,
                other => Error::StoreUnavailable(other.to_string()),
            });
        }

        match message.to_bytes() {
            Ok(payload) => {
                if let Err(e) = self.sink.publish(&payload) {
                    warn!(kind = e.as_label(), "Broadcast of message {} ignored: {e}", message.id);
                }
            }
            Err(e) => warn!("Failed to encode message {} for broadcast: {e}", message.id),
        }

        let shared = Arc::new(message.clone());
        if self.registry.deliver(&message.user, shared) == Delivery::Queued {
            debug!("Delivered message {} to `{}`", message.id, message.user);
        }

        Ok(message)
    }

    /// Every stored message, oldest first.
    pub fn list(&self) -> Result<Vec<Message>> {
        self.store.read_all().map_err(|e| {
            error!(kind = e.as_label(), "Listing messages failed: {e}");
            match e {
                Error::StoreUnavailable(_) => e,
                other => Error::StoreUnavailable(other.to_string()),
            }
        })
    }

    /// Follow messages posted by `user` until `cancel` fires.
    pub fn message_posted(&self, user: &str, cancel: CancellationToken) -> Result<Subscription> {
        self.registry.subscribe(user, cancel)
    }

    pub fn unsubscribe(&self, user: &str) {
        self.registry.unsubscribe(user);
    }
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
