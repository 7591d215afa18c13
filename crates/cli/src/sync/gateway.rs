// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote gateway: submits entries to the remote entry store.
//!
//! Provides a trait-based gateway so the executor can be driven by:
//! - A real WebSocket connection in production
//! - Scripted mock gateways in tests
//!
//! Submission is total: every failure (no credential, connect error,
//! timeout, server rejection) is folded into an [`Outcome`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use ml_core::protocol::{ClientMessage, ServerMessage};
use ml_core::{Outcome, PendingEntry, PublishedEntry};

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No bearer credential is available.
    #[error("no credential")]
    NoCredential,

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// No reply arrived in time.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The server answered with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Submits one entry to the remote entry store.
pub trait Gateway: Send + Sync {
    /// Submit an entry and classify the result.
    fn submit<'a>(
        &'a self,
        entry: &'a PendingEntry,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;

    /// Called once after the last submission of a pass.
    fn end_pass(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}

/// Source of the bearer credential presented to the remote store.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed credential.
impl CredentialSource for Option<String> {
    fn bearer_token(&self) -> Option<String> {
        self.clone()
    }
}

/// Connection settings for [`WebSocketGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// URL of the remote store.
    pub url: String,
    /// Identifies this installation to the remote store.
    pub installation_id: String,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, installation_id: impl Into<String>) -> Self {
        GatewayConfig {
            url: url.into(),
            installation_id: installation_id.into(),
            connect_timeout: Duration::from_secs(3),
            response_timeout: Duration::from_secs(5),
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Gateway over a WebSocket connection using tokio-tungstenite.
///
/// Connects on first use and reuses the connection until the pass ends or
/// an error drops it.
pub struct WebSocketGateway {
    config: GatewayConfig,
    credentials: Arc<dyn CredentialSource>,
    ws: Mutex<Option<WsStream>>,
}

impl WebSocketGateway {
    pub fn new(config: GatewayConfig, credentials: Arc<dyn CredentialSource>) -> Self {
        WebSocketGateway {
            config,
            credentials,
            ws: Mutex::new(None),
        }
    }

    /// Fetch the most recent entries from the remote store, newest first.
    pub async fn fetch_recent(&self, limit: u32) -> GatewayResult<Vec<PublishedEntry>> {
        let token = self
            .credentials
            .bearer_token()
            .ok_or(GatewayError::NoCredential)?;
        let msg = ClientMessage::list(Some(token), limit);

        let mut ws = self.ws.lock().await;
        let reply = self
            .request(&mut ws, &msg, "entries", |reply| {
                matches!(
                    reply,
                    ServerMessage::Entries { .. } | ServerMessage::Error { .. }
                )
            })
            .await?;

        match reply {
            ServerMessage::Entries { entries } => Ok(entries),
            ServerMessage::Error { message } => Err(GatewayError::Server(message)),
            other => Err(GatewayError::ReceiveFailed(format!(
                "unexpected reply: {other:?}"
            ))),
        }
    }

    /// Close the connection, if open.
    pub async fn disconnect(&self) {
        if let Some(mut ws) = self.ws.lock().await.take() {
            let _ = ws.close(None).await;
        }
    }

    async fn submit_entry(&self, entry: &PendingEntry) -> Outcome {
        let Some(token) = self.credentials.bearer_token() else {
            return Outcome::transient(GatewayError::NoCredential.to_string());
        };
        let msg = ClientMessage::submit(entry, &self.config.installation_id, Some(token));
        let local_id = entry.local_id;

        let mut ws = self.ws.lock().await;
        let reply = self
            .request(&mut ws, &msg, "submission reply", |reply| {
                reply.answers() == Some(local_id) || matches!(reply, ServerMessage::Error { .. })
            })
            .await;

        match reply {
            Ok(ServerMessage::Accepted { entry }) => Outcome::Accepted(entry),
            Ok(ServerMessage::Rejected {
                reason, retryable, ..
            }) => {
                if retryable {
                    Outcome::transient(reason)
                } else {
                    Outcome::permanent(reason)
                }
            }
            Ok(ServerMessage::Error { message }) => Outcome::transient(message),
            Ok(other) => Outcome::transient(format!("unexpected reply: {other:?}")),
            Err(e) => Outcome::transient(e.to_string()),
        }
    }

    /// Send `msg` and wait for the first frame accepted by `is_reply`.
    ///
    /// Connects first if needed. Any transport error drops the connection.
    async fn request(
        &self,
        slot: &mut Option<WsStream>,
        msg: &ClientMessage,
        waiting_for: &'static str,
        is_reply: impl Fn(&ServerMessage) -> bool,
    ) -> GatewayResult<ServerMessage> {
        let result = self.exchange(slot, msg, waiting_for, is_reply).await;
        if result.is_err() {
            *slot = None;
        }
        result
    }

    async fn exchange(
        &self,
        slot: &mut Option<WsStream>,
        msg: &ClientMessage,
        waiting_for: &'static str,
        is_reply: impl Fn(&ServerMessage) -> bool,
    ) -> GatewayResult<ServerMessage> {
        if slot.is_none() {
            *slot = Some(self.connect().await?);
        }
        let ws = slot.as_mut().ok_or(GatewayError::ConnectionClosed)?;

        let json = msg
            .to_json()
            .map_err(|e| GatewayError::SerializationError(e.to_string()))?;
        ws.send(Message::Text(json.into()))
            .await
            .map_err(|e| GatewayError::SendFailed(e.to_string()))?;

        let deadline = Instant::now() + self.config.response_timeout;
        loop {
            let frame = tokio::time::timeout_at(deadline, ws.next())
                .await
                .map_err(|_| GatewayError::Timeout(waiting_for))?;

            match frame {
                Some(Ok(Message::Text(text))) => {
                    let reply = ServerMessage::from_json(&text)
                        .map_err(|e| GatewayError::SerializationError(e.to_string()))?;
                    if is_reply(&reply) {
                        return Ok(reply);
                    }
                    debug!(?reply, "ignoring unrelated frame");
                }
                Some(Ok(Message::Close(_))) | None => return Err(GatewayError::ConnectionClosed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(GatewayError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn connect(&self) -> GatewayResult<WsStream> {
        let url = &self.config.url;
        let (ws, _) =
            tokio::time::timeout(self.config.connect_timeout, tokio_tungstenite::connect_async(url))
                .await
                .map_err(|_| GatewayError::Timeout("connection"))?
                .map_err(|e| GatewayError::ConnectionFailed(e.to_string()))?;
        debug!(url = %url, "connected to remote store");
        Ok(ws)
    }
}

impl Gateway for WebSocketGateway {
    fn submit<'a>(
        &'a self,
        entry: &'a PendingEntry,
    ) -> Pin<Box<dyn Future<Output = Outcome> + Send + 'a>> {
        Box::pin(self.submit_entry(entry))
    }

    fn end_pass(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self.disconnect())
    }
}
