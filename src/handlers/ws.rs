//! WebSocket upgrade handler: runs the admission pipeline, then either hands
//! the socket to the session layer or closes it with the rejection code.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use tracing::info;

use crate::gateway::{Admission, ConnectionContext};
use crate::handlers::http::AppState;
use crate::session;

/// GET /ws?token=<jwt> — upgrade endpoint. The token is optional; absence
/// admits the connection anonymously.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let mut ctx = ConnectionContext::websocket(params.get("token").cloned());

    match state.pipeline.admit(&mut ctx).await {
        Admission::Allowed => ws.on_upgrade(move |socket| session::run(socket, ctx)),
        Admission::Rejected { code, reason } => {
            info!(code, %reason, "closing rejected connection");
            // The close frame carries the application-level code; that
            // requires completing the upgrade first.
            ws.on_upgrade(move |socket| close_rejected(socket, code, reason))
        }
    }
}

async fn close_rejected(mut socket: WebSocket, code: u16, reason: String) {
    let frame = CloseFrame {
        code,
        reason: Cow::Owned(reason),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}
