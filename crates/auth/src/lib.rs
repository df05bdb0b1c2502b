//! # Authentication and Authorization
//!
//! - JWT session tokens and Argon2id password hashing
//! - The local [`AuthProvider`] with session change notifications
//! - The Role Resolver, turning an identity into a [`Viewer`]
//! - Navigation Authorization, mapping roles to reachable destinations

pub mod jwt;
pub mod navigation;
pub mod password;
pub mod provider;
pub mod roles;

pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use navigation::{allowed_destinations, gate, is_authorized, menu, Destination, GateDecision, Tier};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordConfig};
pub use provider::{AuthProvider, LocalAuthProvider, Session, SessionEvent};
pub use roles::{assign_role, find_role_by_name, resolve_role, role_label, RoleName, Viewer};
pub use secrecy;
