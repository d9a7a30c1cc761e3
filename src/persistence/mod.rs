//! The `persistence` module provides the durable, append-only message log.
//!
//! [`MessageStore`] is the seam the service talks to. [`sled_store::SledStore`]
//! implements it on an embedded `sled` database, storing the whole log in a
//! single tree named by the configured log key.

pub mod sled_store;

#[cfg(test)]
pub(crate) mod memory_store;

use crate::broker::message::Message;
use crate::utils::Result;

pub use sled_store::SledStore;

/// Durable append-only log of messages.
///
/// Implementations must not keep an authoritative in-memory copy: every
/// `read_all` goes back to the backing medium.
pub trait MessageStore: Send + Sync {
    /// Append `message` to the tail of the log.
    ///
    /// Fails with [`Error::StoreUnavailable`](crate::utils::Error::StoreUnavailable)
    /// when the backing medium cannot be written.
    fn append(&self, message: &Message) -> Result<()>;

    /// Every appended message, oldest first.
    ///
    /// An empty log yields an empty vector. Records that cannot be decoded
    /// are logged and skipped.
    fn read_all(&self) -> Result<Vec<Message>>;
}

#[cfg(test)]
mod tests;
