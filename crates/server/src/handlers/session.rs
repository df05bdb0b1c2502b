//! # Session Handlers
//!
//! Sign in, sign out, token refresh, the navigation menu and the public
//! landing payload.

use auth::{secrecy::SecretString, Destination, Viewer};
use axum::Json;
use error::{AppError, Result, SuccessResponse};

use crate::{
    dto::auth::{LandingResponse, LoginRequest, NavigationResponse, SessionResponse},
    AppState,
};

/// Public landing: tells the client where to go next
pub fn landing_handler(viewer: &Viewer) -> Json<LandingResponse> {
    let authenticated = viewer.role().is_some();
    let next = if authenticated {
        Destination::Incidents
    }
    else {
        Destination::Login
    };

    Json(LandingResponse {
        name: "conducta",
        version: env!("CARGO_PKG_VERSION"),
        authenticated,
        next: next.path(),
    })
}

/// Exchanges credentials for a session token
///
/// # Errors
///
/// Returns `Unauthorized` for unknown emails and wrong passwords alike.
pub async fn login_handler(state: &AppState, req: LoginRequest) -> Result<Json<SessionResponse>> {
    let password = SecretString::from(req.password);
    let session = state.auth.sign_in(&req.email, &password).await?;

    logging::log_auth_event!("sign_in", session.identity, true);

    Ok(Json(session.into()))
}

/// Revokes the presented token
pub async fn logout_handler(state: &AppState, token: Option<String>) -> Result<Json<SuccessResponse>> {
    let token = token.ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
    state.auth.sign_out(&token).await?;

    Ok(Json(SuccessResponse::ok("Signed out")))
}

/// Swaps the presented token for a fresh one
pub async fn refresh_handler(state: &AppState, token: Option<String>) -> Result<Json<SessionResponse>> {
    let token = token.ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
    let session = state.auth.refresh(&token).await?;

    Ok(Json(session.into()))
}

/// The viewer's role and menu
pub fn navigation_handler(viewer: &Viewer) -> Json<NavigationResponse> { Json(NavigationResponse::for_viewer(viewer)) }
