//! # Destination Gate
//!
//! Enforces Navigation Authorization for one destination. Screen loads
//! (`GET`/`HEAD`) that are not allowed get a `303 See Other` to the login
//! screen or to the incidents screen. Mutations get the matching
//! `401`/`403` error body, which carries the same `redirect_to`.

use auth::{gate, Destination, GateDecision};
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use error::AppError;

use super::auth::viewer_of;

pub async fn gate_middleware(State(destination): State<Destination>, request: Request, next: Next) -> Response {
    let viewer = viewer_of(&request);
    let role = viewer.role();

    let redirect_to = match gate(role, destination) {
        GateDecision::Allow => return next.run(request).await,
        GateDecision::RedirectToLogin => Destination::Login,
        GateDecision::RedirectTo(target) => target,
    };

    logging::log_access_redirect!(
        role.map_or("anonymous", |r| r.as_str()),
        destination.path(),
        redirect_to.path()
    );

    let is_screen_load = matches!(*request.method(), Method::GET | Method::HEAD);
    if is_screen_load {
        return Redirect::to(redirect_to.path()).into_response();
    }

    let err = if role.is_none() {
        AppError::unauthorized("Sign in required")
    }
    else {
        AppError::forbidden(format!("{} is not available to this role", destination.label()))
    };
    err.into_response()
}
