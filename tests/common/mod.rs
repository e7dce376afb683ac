// SPDX-License-Identifier: MIT

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use taskboard::config::Config;
use taskboard::db::MemoryStore;
use taskboard::middleware::auth::create_jwt;
use taskboard::models::{User, UserId};
use taskboard::routes::create_router;
use taskboard::AppState;
use tokio::sync::mpsc::UnboundedReceiver;

/// App state over a fresh in-memory store.
#[allow(dead_code)]
pub fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(Config::test_default(), MemoryStore::shared()))
}

/// Create a test app over a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state();
    (create_router(state.clone()), state)
}

/// Register a user directly through the account service.
#[allow(dead_code)]
pub async fn signup_user(state: &AppState, username: &str) -> User {
    state
        .account
        .signup(username, &format!("{username}@example.com"), TEST_PASSWORD)
        .await
        .expect("signup should succeed")
}

/// Password used by [`signup_user`], for flows that re-verify credentials.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "sup3r secret";

/// Mint a session token the way the signup/login handlers do.
#[allow(dead_code)]
pub fn token_for(state: &AppState, user: UserId) -> String {
    create_jwt(user, &state.config.jwt_signing_key, 3600).unwrap()
}

/// Build a request, optionally authenticated and with a JSON body.
#[allow(dead_code)]
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "response body is not JSON ({err}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Attach a capture-only session for `user`. Dispatched frames show up on
/// the returned receiver exactly as a live socket would see them.
#[allow(dead_code)]
pub fn capture_events(state: &AppState, user: UserId) -> UnboundedReceiver<String> {
    let (_conn, rx) = state.registry.register(user);
    rx
}

/// Pop the next captured frame, parsed, or `None` if nothing was delivered.
#[allow(dead_code)]
pub fn next_frame(rx: &mut UnboundedReceiver<String>) -> Option<serde_json::Value> {
    rx.try_recv()
        .ok()
        .map(|frame| serde_json::from_str(&frame).expect("frame should be JSON"))
}

/// Drain all captured frames and return their `event` names.
#[allow(dead_code)]
pub fn drain_event_names(rx: &mut UnboundedReceiver<String>) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(frame) = next_frame(rx) {
        names.push(frame["event"].as_str().unwrap_or_default().to_string());
    }
    names
}
