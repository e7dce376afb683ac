// SPDX-License-Identifier: MIT

//! Task routes: create, list, update, delete.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use super::StatusResponse;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{TaskId, TaskView};
use crate::services::tasks::{CreateTaskRequest, UpdateTaskRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add-task", post(add_task))
        .route("/tasks", get(list_tasks))
        .route("/update-task/{id}", put(update_task))
        .route("/delete-task/{id}", delete(delete_task))
}

async fn add_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskView>)> {
    let view = state.tasks.create(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TaskView>>> {
    let views = state.tasks.list(user.user_id).await?;
    Ok(Json(views))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskView>> {
    let view = state.tasks.update(user.user_id, id, req).await?;
    Ok(Json(view))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<TaskId>,
) -> Result<Json<StatusResponse>> {
    state.tasks.delete(user.user_id, id).await?;
    Ok(StatusResponse::ok("task deleted"))
}
