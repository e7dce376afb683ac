// SPDX-License-Identifier: MIT

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept tokens from the Bearer header or the cookie
//! 3. "Doesn't exist" and "exists, not yours" stay distinguishable
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use taskboard::middleware::auth::TOKEN_COOKIE;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/tasks", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::request(
            "GET",
            "/tasks",
            Some("invalid.token.here"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_bearer_token() {
    let (app, state) = common::create_test_app();
    let user = common::signup_user(&state, "alice").await;
    let token = common::token_for(&state, user.id);

    let response = app
        .oneshot(common::request("GET", "/tasks", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_route_with_cookie_token() {
    let (app, state) = common::create_test_app();
    let user = common::signup_user(&state, "alice").await;
    let token = common::token_for(&state, user.id);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/tasks")
                .header(header::COOKIE, format!("{TOKEN_COOKIE}={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_for_deleted_user_still_hits_not_found() {
    // The middleware only proves the token; a handler looking up the actor's
    // document decides what a stale token means.
    let (app, state) = common::create_test_app();
    let user = common::signup_user(&state, "ghost").await;
    let token = common::token_for(&state, user.id);
    state.store.delete_user(user.id).await.unwrap();

    let response = app
        .oneshot(common::request("GET", "/friends", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_task_is_not_found_but_foreign_task_is_forbidden() {
    let (app, state) = common::create_test_app();
    let owner = common::signup_user(&state, "owner").await;
    let outsider = common::signup_user(&state, "outsider").await;

    let view = state
        .tasks
        .create(
            owner.id,
            serde_json::from_value(json!({
                "text": "private errand",
                "dueDate": "2026-09-01T12:00:00Z"
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    let outsider_token = common::token_for(&state, outsider.id);

    // Nonexistent id: 404
    let response = app
        .clone()
        .oneshot(common::request(
            "PUT",
            &format!("/update-task/{}", taskboard::models::TaskId::new()),
            Some(&outsider_token),
            Some(&json!({"text": "hijack"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Existing but foreign personal task: 403
    let response = app
        .oneshot(common::request(
            "PUT",
            &format!("/update-task/{}", view.id),
            Some(&outsider_token),
            Some(&json!({"text": "hijack"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/tasks")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);

    // Should have CORS headers
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/health", None, None))
        .await
        .unwrap();

    // Health should be accessible without auth
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 0);
}

#[tokio::test]
async fn test_error_body_shape() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::request("GET", "/tasks", None, None))
        .await
        .unwrap();

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert!(body.get("details").is_none());
}
