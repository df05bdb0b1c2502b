//! # Viewer Middleware
//!
//! Resolves the [`Viewer`] once per request and stores it in the request
//! extensions for the gate and the handlers.

use auth::{extract_bearer_token, resolve_role, Viewer};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Reads the bearer token from the Authorization header, if any.
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}

/// Attaches the resolved [`Viewer`] to the request.
///
/// Missing, malformed, expired or revoked tokens all yield
/// `Viewer::Unauthenticated`; this layer never rejects on its own.
pub async fn viewer_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let identity = match bearer_token(&request) {
        Some(token) => state.auth.current_identity(&token).await,
        None => None,
    };

    let viewer = resolve_role(&state.db, identity).await;
    request.extensions_mut().insert(viewer);

    next.run(request).await
}

/// The viewer attached by [`viewer_middleware`], or unauthenticated.
pub fn viewer_of(request: &Request) -> Viewer {
    request
        .extensions()
        .get::<Viewer>()
        .cloned()
        .unwrap_or(Viewer::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_bearer_token() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).as_deref(), Some("abc123"));

        let request = Request::builder()
            .header(header::AUTHORIZATION, "Basic abc123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), None);
    }

    #[test]
    fn test_missing_viewer_is_unauthenticated() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(viewer_of(&request), Viewer::Unauthenticated);
    }
}
