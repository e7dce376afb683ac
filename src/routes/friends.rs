// SPDX-License-Identifier: MIT

//! Friend routes: requests, responses, listing, removal.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use super::StatusResponse;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::friends::{
    FriendsList, RemoveFriendRequest, RespondFriendRequest, SendFriendRequest,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/send-friend-request", post(send_friend_request))
        .route("/respond-friend-request", post(respond_friend_request))
        .route("/friends", get(list_friends))
        .route("/remove-friend", post(remove_friend))
}

async fn send_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SendFriendRequest>,
) -> Result<Json<StatusResponse>> {
    state.friends.send_request(user.user_id, req).await?;
    Ok(StatusResponse::ok("friend request sent"))
}

async fn respond_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RespondFriendRequest>,
) -> Result<Json<StatusResponse>> {
    let accepted = req.accept;
    state.friends.respond_request(user.user_id, req).await?;
    Ok(StatusResponse::ok(if accepted {
        "friend request accepted"
    } else {
        "friend request declined"
    }))
}

async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FriendsList>> {
    let list = state.friends.list(user.user_id).await?;
    Ok(Json(list))
}

async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RemoveFriendRequest>,
) -> Result<Json<StatusResponse>> {
    state.friends.remove(user.user_id, req).await?;
    Ok(StatusResponse::ok("friend removed"))
}
