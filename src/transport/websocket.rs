//! WebSocket transport
//!
//! Accepts TCP/WebSocket connections and translates JSON frames into
//! `MessageService` calls. Responsibilities:
//! - one task per connection that owns both socket halves and, while the
//!   client follows an author, that author's `Subscription`
//! - replies and live deliveries are written straight to the socket, so a
//!   client that stops reading stalls its own loop and the bounded registry
//!   queue starts dropping, rather than an outbound buffer growing
//! - a per-connection cancellation token that fires on disconnect or server
//!   shutdown, which is what tears down the connection's registry entry

use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{Message, MessageService, Subscription};
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::{Error, Result};

type WsSink = SplitSink<WebSocketStream<TcpStream>, WsMessage>;

/// Bind `addr` and serve until `shutdown` fires.
pub async fn start_websocket_server(
    addr: String,
    service: MessageService,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, service, shutdown).await;
    Ok(())
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, service: MessageService, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("WebSocket server shutting down");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {e}");
                    continue;
                }
            },
        };

        let service = service.clone();
        let conn_token = shutdown.child_token();
        tokio::spawn(async move {
            debug!("Connection from {peer}");
            handle_connection(stream, service, conn_token).await;
            debug!("{peer} disconnected");
        });
    }
}

enum Event {
    Shutdown,
    Delivery(Option<Arc<Message>>),
    Frame(Option<std::result::Result<WsMessage, tungstenite::Error>>),
}

/// Next live message for the followed author; never resolves when the
/// connection follows nobody.
async fn next_delivery(following: &mut Option<Subscription>) -> Option<Arc<Message>> {
    match following {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

async fn send_frame(ws_sender: &mut WsSink, frame: &ServerMessage) -> bool {
    let text = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize frame: {e}");
            return true;
        }
    };
    match ws_sender.send(WsMessage::text(text)).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Send loop closed: {e}");
            false
        }
    }
}

async fn handle_connection(stream: TcpStream, service: MessageService, conn_token: CancellationToken) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut following: Option<Subscription> = None;

    loop {
        let event = tokio::select! {
            _ = conn_token.cancelled() => Event::Shutdown,
            delivered = next_delivery(&mut following) => Event::Delivery(delivered),
            frame = ws_receiver.next() => Event::Frame(frame),
        };

        let outbound = match event {
            Event::Shutdown => break,
            Event::Delivery(Some(message)) => ServerMessage::Message {
                message: (*message).clone(),
            },
            Event::Delivery(None) => {
                // removed from outside, e.g. `MessageService::unsubscribe`
                if let Some(ended) = following.take() {
                    debug!("Subscription to `{}` ended", ended.key());
                }
                continue;
            }
            Event::Frame(None) => break,
            Event::Frame(Some(Err(e))) => {
                debug!("WebSocket read error: {e}");
                break;
            }
            Event::Frame(Some(Ok(msg))) => {
                if msg.is_close() {
                    break;
                }
                if !msg.is_text() {
                    continue;
                }
                let Ok(text) = msg.to_text() else {
                    continue;
                };
                match serde_json::from_str::<ClientMessage>(text) {
                    Ok(request) => handle_request(request, &service, &conn_token, &mut following),
                    Err(err) => {
                        warn!(
                            "Invalid client message: {err} | {}",
                            text.chars().take(100).collect::<String>()
                        );
                        ServerMessage::Error {
                            message: format!("invalid message: {err}"),
                        }
                    }
                }
            }
        };

        if !send_frame(&mut ws_sender, &outbound).await {
            break;
        }
    }

    conn_token.cancel();
    if let Some(subscription) = following.take() {
        subscription.unsubscribe();
    }
}

fn handle_request(
    request: ClientMessage,
    service: &MessageService,
    conn_token: &CancellationToken,
    following: &mut Option<Subscription>,
) -> ServerMessage {
    match request {
        ClientMessage::PostMessage { user, text } => match service.post(&user, &text) {
            Ok(message) => ServerMessage::Posted { message },
            Err(e) => error_frame(e),
        },
        ClientMessage::Messages => match service.list() {
            Ok(messages) => ServerMessage::Messages { messages },
            Err(e) => error_frame(e),
        },
        ClientMessage::MessagePosted { user } => {
            if let Some(current) = following.as_ref() {
                return ServerMessage::Error {
                    message: format!("connection already follows `{}`", current.key()),
                };
            }
            match service.message_posted(&user, conn_token.child_token()) {
                Ok(subscription) => {
                    *following = Some(subscription);
                    ServerMessage::Subscribed { user }
                }
                Err(e) => error_frame(e),
            }
        }
        ClientMessage::Unsubscribe => match following.take() {
            Some(subscription) => {
                let user = subscription.key().to_string();
                subscription.unsubscribe();
                ServerMessage::Unsubscribed { user }
            }
            None => ServerMessage::Error {
                message: "not following anyone".to_string(),
            },
        },
    }
}

fn error_frame(err: Error) -> ServerMessage {
    ServerMessage::Error {
        message: err.to_string(),
    }
}
