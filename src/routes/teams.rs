// SPDX-License-Identifier: MIT

//! Team routes: creation, listing, invites, management, membership.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};

use super::StatusResponse;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{TeamId, TeamView};
use crate::services::teams::{
    CreateTeamRequest, InviteRequest, LeaveTeamRequest, ManageTeamRequest, RespondInviteRequest,
    TeamInvite, TeamsList,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-team", post(create_team))
        .route("/teams", get(list_teams))
        .route("/team-invites", get(team_invites))
        .route("/invite-to-team", post(invite_to_team))
        .route("/respond-team-invite", post(respond_team_invite))
        .route("/manage-team", post(manage_team))
        .route("/leave-team", post(leave_team))
        .route("/delete-team/{id}", delete(delete_team))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamView>)> {
    let view = state.teams.create(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TeamsList>> {
    let list = state.teams.list(user.user_id).await?;
    Ok(Json(list))
}

async fn team_invites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TeamInvite>>> {
    let invites = state.teams.invites(user.user_id).await?;
    Ok(Json(invites))
}

async fn invite_to_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<InviteRequest>,
) -> Result<Json<StatusResponse>> {
    state.teams.invite(user.user_id, req).await?;
    Ok(StatusResponse::ok("invite sent"))
}

async fn respond_team_invite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RespondInviteRequest>,
) -> Result<Json<StatusResponse>> {
    let accepted = req.accept;
    state.teams.respond_invite(user.user_id, req).await?;
    Ok(StatusResponse::ok(if accepted {
        "invite accepted"
    } else {
        "invite declined"
    }))
}

async fn manage_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ManageTeamRequest>,
) -> Result<Json<TeamView>> {
    let view = state.teams.manage(user.user_id, req).await?;
    Ok(Json(view))
}

async fn leave_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LeaveTeamRequest>,
) -> Result<Json<StatusResponse>> {
    state.teams.leave(user.user_id, req.team_id).await?;
    Ok(StatusResponse::ok("left team"))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<TeamId>,
) -> Result<Json<StatusResponse>> {
    state.teams.delete(user.user_id, id).await?;
    Ok(StatusResponse::ok("team deleted"))
}
