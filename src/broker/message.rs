//! Message definitions
//!
//! `Message` is the immutable record that flows through the store, the
//! broadcast sink and every subscriber queue. Once built it is shared behind
//! an `Arc` and never mutated.
//!
//! The JSON shape (`id`, `createdAt`, `user`, `text`) is used both for the
//! stored records and for broadcast payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub user: String,
    pub text: String,
}

impl Message {
    /// Build a new message with a fresh id and the current UTC time.
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            user: user.into(),
            text: text.into(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
