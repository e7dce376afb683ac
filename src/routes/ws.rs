// SPDX-License-Identifier: MIT

//! WebSocket endpoint for live events.
//!
//! Clients authenticate the handshake with `?token=` or a Bearer header,
//! then receive event frames pushed by the dispatcher. The socket task
//! pumps two sources: the per-connection channel from the registry and
//! inbound frames from the client. Server pings keep intermediaries from
//! idling the connection out; a client silent past the timeout is dropped.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::{routing::get, Router};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::{interval, Instant};

use crate::error::{AppError, Result};
use crate::middleware::auth::decode_token;
use crate::models::UserId;
use crate::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Deserialize)]
struct WsQuery {
    token: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws", get(ws_handler))
}

/// Authenticate the handshake before upgrading. Browsers cannot set
/// headers on WebSocket connects, so the token also rides the query
/// string.
async fn ws_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response> {
    let token = query
        .token
        .or_else(|| bearer_token(&headers))
        .ok_or(AppError::Unauthorized)?;
    let user_id = decode_token(&token, &state.config.jwt_signing_key)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId) {
    let (conn_id, mut events) = state.registry.register(user_id);
    tracing::info!(user_id = %user_id, conn_id = %conn_id, "websocket connected");

    let (mut sink, mut stream) = socket.split();
    let mut ping = interval(PING_INTERVAL);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            frame = events.recv() => {
                let Some(frame) = frame else { break };
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Ping(payload))) => {
                        last_seen = Instant::now();
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => last_seen = Instant::now(),
                }
            }
            _ = ping.tick() => {
                if last_seen.elapsed() > CLIENT_TIMEOUT {
                    tracing::info!(user_id = %user_id, conn_id = %conn_id, "websocket timed out");
                    break;
                }
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.registry.unregister(user_id, conn_id);
    tracing::info!(user_id = %user_id, conn_id = %conn_id, "websocket disconnected");
}
