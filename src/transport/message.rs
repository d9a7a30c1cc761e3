use serde::{Deserialize, Serialize};

use crate::broker::message::Message;

/// Frames a client may send.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    PostMessage { user: String, text: String },
    Messages,
    MessagePosted { user: String },
    Unsubscribe,
}

/// Frames the server sends back.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to `post_message`.
    Posted { message: Message },
    /// Reply to `messages`.
    Messages { messages: Vec<Message> },
    /// A live delivery for the followed author.
    Message { message: Message },
    Subscribed { user: String },
    Unsubscribed { user: String },
    Error { message: String },
}
