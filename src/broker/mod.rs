//! The `broker` module is the core of `feedhub`.
//!
//! - `message`: the immutable `Message` record
//! - `registry`: live per-author subscriptions with bounded queues
//! - `service`: post/list/subscribe on top of the store, sink and registry

pub mod message;
pub mod registry;
pub mod service;

pub use message::Message;
pub use registry::{Delivery, SubscriberRegistry, Subscription};
pub use service::MessageService;
