//! # Session Data Transfer Objects
//!
//! Request and response types for sign in, navigation and landing.

use auth::{Destination, RoleName, Session, Viewer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for sign in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// An issued session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponse {
    pub success:      bool,
    pub access_token: String,
    pub token_type:   String,
    pub expires_in:   u64,
    pub identity:     Uuid,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            success:      true,
            access_token: session.token,
            token_type:   session.token_type.to_string(),
            expires_in:   session.expires_in,
            identity:     session.identity,
        }
    }
}

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub destination: Destination,
    pub label:       &'static str,
    pub path:        &'static str,
}

impl From<Destination> for MenuItem {
    fn from(destination: Destination) -> Self {
        Self {
            destination,
            label: destination.label(),
            path: destination.path(),
        }
    }
}

/// The viewer and what they may navigate to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationResponse {
    pub authenticated: bool,
    pub display_name:  Option<String>,
    pub role:          Option<RoleName>,
    pub role_label:    Option<&'static str>,
    pub menu:          Vec<MenuItem>,
    /// Every destination a direct visit may reach
    pub allowed:       Vec<Destination>,
}

impl NavigationResponse {
    pub fn for_viewer(viewer: &Viewer) -> Self {
        let role = viewer.role();
        let display_name = match viewer {
            Viewer::Authenticated {
                display_name, ..
            } => Some(display_name.clone()),
            Viewer::Unauthenticated => None,
        };

        Self {
            authenticated: role.is_some(),
            display_name,
            role,
            role_label: role.map(|r| r.label()),
            menu: auth::menu(role).into_iter().map(MenuItem::from).collect(),
            allowed: auth::allowed_destinations(role),
        }
    }
}

/// Public landing payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandingResponse {
    pub name:          &'static str,
    pub version:       &'static str,
    pub authenticated: bool,
    /// Where the viewer should go next
    pub next:          &'static str,
}
