//! The `error` module defines the error type shared across `feedhub`.
//!
//! Only store and registration failures reach callers of the service.
//! Broadcast failures and malformed stored records are produced here too,
//! but they are logged and recovered at the boundary where they occur.

use thiserror::Error;

/// Errors raised by the store, the registry and the surrounding plumbing.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing log could not be read or written.
    #[error("message store unavailable: {0}")]
    StoreUnavailable(String),

    /// A live subscription already exists for this key.
    #[error("`{0}` has already been subscribed")]
    AlreadySubscribed(String),

    /// A stored record could not be decoded into a message.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The broadcast sink rejected a payload.
    #[error("broadcast failed: {0}")]
    Broadcast(String),

    /// Author or subscriber key was empty.
    #[error("user must not be empty")]
    InvalidUser,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short stable label for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::AlreadySubscribed(_) => "already_subscribed",
            Error::MalformedRecord(_) => "malformed_record",
            Error::Broadcast(_) => "broadcast",
            Error::InvalidUser => "invalid_user",
            Error::Serialization(_) => "serialization",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
