//! Per-connection chat session.
//!
//! This is the boundary the admission pipeline hands off to; everything
//! protocol-level lives downstream of admission. The session here is a thin
//! greeting/ping/echo loop; restriction checks never happen at this layer.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::gateway::ConnectionContext;
use crate::models::Identity;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Chat { message: String },
    Ping,
}

pub async fn run(socket: WebSocket, ctx: ConnectionContext) {
    let session_id = Uuid::new_v4();
    info!(%session_id, authenticated = ctx.is_authenticated(), "chat session opened");

    let (mut sender, mut receiver) = socket.split();

    let greeting = json!({
        "event": "connection_established",
        "data": {
            "session_id": session_id,
            "authenticated": ctx.is_authenticated(),
            "user_id": ctx.identity.user().map(|u| u.id),
        }
    });
    if sender.send(Message::Text(greeting.to_string())).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                    match client_msg {
                        ClientMessage::Ping => {
                            let pong = json!({ "event": "pong", "data": {} });
                            if sender.send(Message::Text(pong.to_string())).await.is_err() {
                                break;
                            }
                        }
                        ClientMessage::Chat { message } => {
                            let reply = match &ctx.identity {
                                Identity::Authenticated(user) => json!({
                                    "event": "chat:message",
                                    "data": { "message": message, "user_id": user.id }
                                }),
                                Identity::Anonymous => json!({
                                    "event": "error",
                                    "data": { "message": "authentication required" }
                                }),
                            };
                            if sender.send(Message::Text(reply.to_string())).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(%session_id, "chat session closed");
}
