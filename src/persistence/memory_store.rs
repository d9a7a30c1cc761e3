//! In-memory log for tests that need a store which can be taken offline.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::broker::message::Message;
use crate::persistence::MessageStore;
use crate::utils::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Message>>,
    down: AtomicBool,
}

impl MemoryStore {
    /// While down, every call fails with `StoreUnavailable`.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl MessageStore for MemoryStore {
    fn append(&self, message: &Message) -> Result<()> {
        self.check()?;
        self.records.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Message>> {
        self.check()?;
        Ok(self.records.lock().unwrap().clone())
    }
}
