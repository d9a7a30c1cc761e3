//! Broadcast sink
//!
//! After a message is durably appended its encoded bytes are handed to a
//! [`BroadcastSink`] so consumers outside the service can react. Publishing
//! is fire-and-forget: the caller logs a failure and carries on.

pub mod channel;

use crate::utils::Result;

pub use channel::{ChannelSink, Payload};

/// Opaque publish channel for newly appended messages.
pub trait BroadcastSink: Send + Sync {
    /// Hand `payload` to out-of-process consumers. Must not block.
    fn publish(&self, payload: &[u8]) -> Result<()>;
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl BroadcastSink for NoopSink {
    fn publish(&self, _payload: &[u8]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
