//! Message log backed by `sled`
//!
//! Keys are big-endian ids from `Db::generate_id`, which are strictly
//! increasing, so iterating the tree yields records in append order even
//! when two messages share a timestamp.

use sled::{Db, Tree};
use tracing::{error, warn};

use crate::broker::message::Message;
use crate::persistence::MessageStore;
use crate::utils::{Error, Result};

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    log: Tree,
    log_key: String,
}

impl SledStore {
    /// Open or create a sled database at `path` and its `log_key` tree.
    pub fn open(path: &str, log_key: &str) -> Result<Self> {
        let db = sled::open(path).map_err(|e| {
            let err = Error::from(e);
            error!(kind = err.as_label(), "Failed to open sled DB at '{path}': {err}");
            err
        })?;
        Self::with_db(db, log_key)
    }

    /// Use an already opened database.
    pub fn with_db(db: Db, log_key: &str) -> Result<Self> {
        let log = db.open_tree(log_key)?;
        Ok(Self {
            db,
            log,
            log_key: log_key.to_string(),
        })
    }

    pub fn log_key(&self) -> &str {
        &self.log_key
    }

    /// Number of raw records in the log, malformed ones included.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Append an undecoded record. Used to import or repair logs.
    pub fn append_raw(&self, record: &[u8]) -> Result<()> {
        let id = self.db.generate_id()?;
        self.log.insert(id.to_be_bytes(), record)?;
        self.log.flush()?;
        Ok(())
    }
}

impl MessageStore for SledStore {
    fn append(&self, message: &Message) -> Result<()> {
        let record = message.to_bytes()?;
        self.append_raw(&record).map_err(|e| {
            error!(
                kind = e.as_label(),
                "Failed to append message {} to '{}': {e}", message.id, self.log_key
            );
            e
        })
    }

    fn read_all(&self) -> Result<Vec<Message>> {
        let mut messages = Vec::with_capacity(self.log.len());
        for entry in self.log.iter() {
            let (key, value) = entry.map_err(|e| {
                let err = Error::from(e);
                error!(kind = err.as_label(), "Failed to read '{}': {err}", self.log_key);
                err
            })?;
            match Message::from_bytes(&value) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    let err = Error::MalformedRecord(format!("key {key:?}: {e}"));
                    warn!(kind = err.as_label(), "Skipping record in '{}': {err}", self.log_key);
                }
            }
        }
        Ok(messages)
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("log_key", &self.log_key)
            .finish()
    }
}
