//! # feedhub
//!
//! `feedhub` is an in-memory fan-out for a durable message log. Posted
//! messages are appended to a `sled` log, broadcast to one external
//! channel, and delivered live to whoever currently follows their author.
//!
//! ## Core Modules
//!
//! - `broker`: the `Message` record, the subscriber registry and the service
//!   that ties post/list/subscribe together.
//! - `persistence`: the append-only message log.
//! - `broadcast`: the fire-and-forget sink notified after each append.
//! - `config`: settings loaded from file and environment.
//! - `transport`: a JSON-over-WebSocket adapter for the service.
//! - `utils`: error type and logging setup.

pub mod broadcast;
pub mod broker;
pub mod config;
pub mod persistence;
pub mod transport;
pub mod utils;

pub use broker::{Message, MessageService, SubscriberRegistry, Subscription};
pub use utils::{Error, Result};
