//! # API Response Types
//!
//! Wire format shared by every handler.
//!
//! ## Error Format
//!
//! ```json
//! {
//!   "success": false,
//!   "code": "FORBIDDEN",
//!   "message": "Coordinator role required",
//!   "redirect_to": "/incidents"
//! }
//! ```

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// JSON body rendered for every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Always `false`.
    pub success:     bool,
    /// Stable machine-readable error code.
    pub code:        String,
    /// Human-readable message.
    pub message:     String,
    /// Where the client should navigate next, for access-control failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl ErrorBody {
    /// Builds the body for an error.
    ///
    /// Server-side failures never leak their internal message.
    pub fn from_error(err: &AppError) -> Self {
        let message = if err.is_server_error() && !matches!(err, AppError::Unavailable { .. }) {
            "Internal server error".to_string()
        }
        else {
            err.message()
        };

        Self {
            success: false,
            code: err.code().to_string(),
            message,
            redirect_to: err.redirect_to().map(str::to_string),
        }
    }
}

/// Generic acknowledgement body for operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    /// Creates a successful acknowledgement.
    pub fn ok(message: impl ToString) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }
        else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let status = self.status();
        let body = ErrorBody::from_error(&self);
        let mut response = (status, Json(body)).into_response();

        if let Some(location) = self.redirect_to() {
            response
                .headers_mut()
                .insert(header::LOCATION, HeaderValue::from_static(location));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_error_body_hides_internal_details() {
        let body = ErrorBody::from_error(&AppError::database("relation \"users\" does not exist"));
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.code, "DATABASE_ERROR");
        assert!(!body.success);
    }

    #[test]
    fn test_error_body_keeps_client_message() {
        let body = ErrorBody::from_error(&AppError::constraint("Group still has students"));
        assert_eq!(body.message, "Group still has students");
        assert_eq!(body.redirect_to, None);
    }

    #[test]
    fn test_error_body_redirect() {
        let body = ErrorBody::from_error(&AppError::forbidden("Admin role required"));
        assert_eq!(body.redirect_to.as_deref(), Some("/incidents"));

        let json = serde_json::to_value(&ErrorBody::from_error(&AppError::not_found("x"))).unwrap();
        assert!(json.get("redirect_to").is_none());
    }

    #[test]
    fn test_into_response_sets_location() {
        let response = AppError::unauthorized("No session").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );

        let response = AppError::validation("bad").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_success_response() {
        let ok = SuccessResponse::ok("Signed out");
        assert!(ok.success);
        assert_eq!(ok.message, "Signed out");
    }
}
