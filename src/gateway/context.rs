//! Per-connection transient state threaded through the admission stages.

use crate::models::Identity;

/// Transport the inbound request arrived on. The admission stages only act
/// on WebSocket upgrades; anything else passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    WebSocket,
    Http,
}

/// Created at upgrade time, annotated by the stages, handed to the session
/// layer on success. Never persisted.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub transport: TransportKind,
    /// Raw `token` query parameter, if any.
    pub token: Option<String>,
    /// Anonymous until the authentication stage runs.
    pub identity: Identity,
}

impl ConnectionContext {
    pub fn websocket(token: Option<String>) -> Self {
        Self {
            transport: TransportKind::WebSocket,
            token,
            identity: Identity::Anonymous,
        }
    }

    pub fn http() -> Self {
        Self {
            transport: TransportKind::Http,
            token: None,
            identity: Identity::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }
}
