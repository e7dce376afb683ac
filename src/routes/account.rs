// SPDX-License-Identifier: MIT

//! Account routes: signup, login, password change, profile, deletion.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::StatusResponse;
use crate::error::Result;
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::UserId;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued on signup and login; the frontend keeps the token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDetailsResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Routes reachable without a token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Routes behind the auth middleware (applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/update-password", put(update_password))
        .route("/user-details", get(user_details))
        .route("/delete-account", delete(delete_account))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    let user = state
        .account
        .signup(&req.username, &req.email, &req.password)
        .await?;
    let token = create_jwt(
        user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_secs,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user_id: user.id,
            username: user.username,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state.account.login(&req.email, &req.password).await?;
    let token = create_jwt(
        user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_secs,
    )?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user_id: user.id,
        username: user.username,
    }))
}

async fn update_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<StatusResponse>> {
    req.validate()?;
    state
        .account
        .update_password(user.user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusResponse::ok("password updated"))
}

async fn user_details(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserDetailsResponse>> {
    let profile = state.account.user_details(user.user_id).await?;
    Ok(Json(UserDetailsResponse {
        id: profile.id,
        username: profile.username,
        email: profile.email,
    }))
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<DeleteAccountRequest>,
) -> Result<Json<StatusResponse>> {
    state
        .account
        .delete_account(user.user_id, &req.password)
        .await?;
    Ok(StatusResponse::ok("account deleted"))
}
