use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::broadcast::BroadcastSink;
use crate::utils::Result;

/// Encoded message as seen by broadcast receivers.
pub type Payload = Arc<[u8]>;

/// Sink over a `tokio::sync::broadcast` channel.
///
/// Slow receivers lag and lose the oldest payloads; the publisher never
/// waits. With no receiver attached the payload is discarded and the
/// publish still succeeds.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: broadcast::Sender<Payload>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Attach a new receiver. It sees payloads published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Payload> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl BroadcastSink for ChannelSink {
    fn publish(&self, payload: &[u8]) -> Result<()> {
        if let Err(e) = self.sender.send(Arc::from(payload)) {
            debug!("No broadcast receivers, discarded {} bytes", e.0.len());
        }
        Ok(())
    }
}
