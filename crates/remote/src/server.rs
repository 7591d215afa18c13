// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections and request/response routing. Every text frame
//! gets exactly one reply.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use ml_core::protocol::{ClientMessage, ServerMessage};
use ml_core::{analyze, NewEntry};

use crate::state::ServerState;

/// Longest entry the store accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Most entries returned by one list request.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await?;
    Ok(())
}

/// Accept connections on `listener` until it fails.
pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {
                // Ignore other message types (Binary, Pong, Frame)
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process one client frame and build the reply.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            debug!("Undecodable frame: {}", e);
            return ServerMessage::error(format!("invalid message: {}", e));
        }
    };

    match msg {
        ClientMessage::Submit {
            local_id,
            installation_id,
            content,
            created_at_local,
            token,
        } => {
            if !state.authorize(token.as_deref()) {
                return ServerMessage::rejected(local_id, "unauthorized", true);
            }
            if let Some(reason) = validate_content(&content) {
                debug!(%local_id, reason, "Rejected entry");
                return ServerMessage::rejected(local_id, reason, false);
            }
            if installation_id.trim().is_empty() {
                return ServerMessage::rejected(local_id, "missing installation id", false);
            }

            let entry = NewEntry {
                installation_id: &installation_id,
                local_id,
                content: &content,
                emotion: analyze(&content),
                created_at_local,
            };
            match state.store_entry(&entry).await {
                Ok((stored, inserted)) => {
                    if inserted {
                        debug!(%local_id, server_id = stored.server_id, "Stored entry");
                    } else {
                        debug!(%local_id, server_id = stored.server_id, "Duplicate submission");
                    }
                    ServerMessage::accepted(stored)
                }
                Err(e) => {
                    error!(%local_id, "Failed to store entry: {}", e);
                    ServerMessage::rejected(local_id, "storage error", true)
                }
            }
        }

        ClientMessage::List { token, limit } => {
            if !state.authorize(token.as_deref()) {
                return ServerMessage::error("unauthorized");
            }
            let limit = limit.min(MAX_LIST_LIMIT) as usize;
            match state.recent(limit).await {
                Ok(entries) => {
                    debug!("List response: {} entries", entries.len());
                    ServerMessage::entries(entries)
                }
                Err(e) => {
                    error!("Failed to list entries: {}", e);
                    ServerMessage::error("storage error")
                }
            }
        }

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}

/// Why `content` can never be stored, if it can't.
fn validate_content(content: &str) -> Option<&'static str> {
    if content.trim().is_empty() {
        Some("content is empty")
    } else if content.chars().count() > MAX_CONTENT_CHARS {
        Some("content exceeds 10000 characters")
    } else {
        None
    }
}
