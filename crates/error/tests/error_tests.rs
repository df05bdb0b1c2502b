//! # Error Crate Tests
//!
//! Rendering of application errors through Axum.

use axum::{
    body::to_bytes,
    http::{header, StatusCode},
    response::IntoResponse,
};
use error::{AppError, ErrorBody};

async fn render(err: AppError) -> (StatusCode, Option<String>, ErrorBody) {
    let response = err.into_response();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unauthenticated_response_points_to_login() {
    let (status, location, body) = render(AppError::unauthorized("Sign in required")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(location.as_deref(), Some("/login"));
    assert_eq!(body.code, "UNAUTHORIZED");
    assert_eq!(body.redirect_to.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_underprivileged_response_points_to_incidents() {
    let (status, location, body) = render(AppError::forbidden("Admin role required")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(location.as_deref(), Some("/incidents"));
    assert_eq!(body.message, "Admin role required");
}

#[tokio::test]
async fn test_constraint_violation_response() {
    let (status, location, body) = render(AppError::constraint("Group still has students")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(location.is_none());
    assert_eq!(body.code, "CONSTRAINT_VIOLATION");
    assert!(!body.success);
}

#[tokio::test]
async fn test_unavailable_response_keeps_message() {
    let (status, _, body) = render(AppError::unavailable("database unreachable")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body.message, "database unreachable");
}

#[tokio::test]
async fn test_internal_response_is_opaque() {
    let (status, _, body) = render(AppError::internal("panic in handler")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, "Internal server error");
}
