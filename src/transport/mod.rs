//! The `transport` module exposes the service over WebSockets.
//!
//! Each text frame is a JSON [`message::ClientMessage`] mapped onto one of
//! `post`, `list` or `message_posted`; replies and live deliveries go back
//! as [`message::ServerMessage`] frames.

pub mod message;
pub mod websocket;
