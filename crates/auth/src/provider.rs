//! # Auth Provider
//!
//! The session boundary: sign in, look up the identity behind a token,
//! refresh and sign out. Every session change is broadcast as a
//! [`SessionEvent`] so listeners can re-evaluate navigation.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{SystemTime, UNIX_EPOCH},
};

use entity::users;
use error::{AppError, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    jwt::{create_access_token, validate_token, Claims, JwtConfig},
    password::verify_password,
};

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 64;

/// An issued session token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token:      String,
    pub token_type: &'static str,
    pub identity:   Uuid,
    /// Lifetime of the token in seconds
    pub expires_in: u64,
}

/// A change in session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn {
        identity: Uuid,
    },
    SignedOut {
        identity: Uuid,
    },
    TokenRefreshed {
        identity: Uuid,
    },
    /// The identity's role was reassigned.
    RoleChanged {
        identity: Uuid,
    },
}

impl SessionEvent {
    pub fn identity(&self) -> Uuid {
        match self {
            Self::SignedIn {
                identity,
            }
            | Self::SignedOut {
                identity,
            }
            | Self::TokenRefreshed {
                identity,
            }
            | Self::RoleChanged {
                identity,
            } => *identity,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SignedIn {
                ..
            } => "signed_in",
            Self::SignedOut {
                ..
            } => "signed_out",
            Self::TokenRefreshed {
                ..
            } => "token_refreshed",
            Self::RoleChanged {
                ..
            } => "role_changed",
        }
    }
}

/// Source of authenticated identities.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchanges credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for unknown emails and wrong passwords alike.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session>;

    /// The identity behind `token`, or `None` if the token is invalid,
    /// expired or revoked.
    async fn current_identity(&self, token: &str) -> Option<Uuid>;

    /// Replaces a valid token with a fresh one, revoking the old.
    ///
    /// # Errors
    ///
    /// Returns a JWT error if the token is not currently valid.
    async fn refresh(&self, token: &str) -> Result<Session>;

    /// Revokes `token`.
    ///
    /// # Errors
    ///
    /// Returns a JWT error if the token is not currently valid.
    async fn sign_out(&self, token: &str) -> Result<()>;

    /// Subscribes to session changes.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// Broadcasts a session change to current subscribers.
    fn publish(&self, event: SessionEvent);
}

/// Auth provider backed by the `users` table and signed JWTs.
///
/// Revoked token ids are kept in memory until their expiry.
pub struct LocalAuthProvider {
    db:      DatabaseConnection,
    jwt:     JwtConfig,
    revoked: RwLock<HashMap<String, u64>>,
    events:  broadcast::Sender<SessionEvent>,
}

impl LocalAuthProvider {
    pub fn new(db: DatabaseConnection, jwt: JwtConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            db,
            jwt,
            revoked: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig { &self.jwt }

    fn issue(&self, identity: Uuid, email: &str) -> Result<Session> {
        Ok(Session {
            token: create_access_token(&self.jwt, identity, email)?,
            token_type: "Bearer",
            identity,
            expires_in: self.jwt.expiration_seconds,
        })
    }

    /// A poisoned lock counts as revoked.
    fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .map_or(true, |revoked| revoked.contains_key(jti))
    }

    fn revoke(&self, claims: &Claims) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut revoked = self
            .revoked
            .write()
            .map_err(|_| AppError::internal("Revocation list lock poisoned"))?;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti.clone(), claims.exp);
        Ok(())
    }

    /// Validates a token and rejects revoked ones.
    fn live_claims(&self, token: &str) -> Result<Claims> {
        let claims = validate_token(&self.jwt, token)?;
        if self.is_revoked(&claims.jti) {
            return Err(AppError::JwtInvalidToken);
        }
        Ok(claims)
    }
}

#[async_trait::async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;

        let Some(user) = user
        else {
            tracing::info!(target: "auth", email = %email, "Sign in for unknown email");
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        let candidate = SecretString::from(password.expose_secret().to_string());
        let stored = user.password_hash.clone();
        tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?
            .map_err(|e| {
                tracing::info!(target: "auth", user_id = %user.id, "Sign in rejected");
                AppError::from(e)
            })?;

        let session = self.issue(user.id, &user.email)?;
        tracing::info!(target: "auth", user_id = %user.id, "Signed in");
        self.publish(SessionEvent::SignedIn {
            identity: user.id,
        });

        Ok(session)
    }

    async fn current_identity(&self, token: &str) -> Option<Uuid> {
        match self.live_claims(token).and_then(|claims| claims.identity()) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(target: "auth", error = %e, "Token rejected");
                None
            },
        }
    }

    async fn refresh(&self, token: &str) -> Result<Session> {
        let claims = self.live_claims(token)?;
        let identity = claims.identity()?;

        let session = self.issue(identity, &claims.email)?;
        self.revoke(&claims)?;

        tracing::info!(target: "auth", user_id = %identity, "Token refreshed");
        self.publish(SessionEvent::TokenRefreshed {
            identity,
        });

        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        let claims = self.live_claims(token)?;
        let identity = claims.identity()?;
        self.revoke(&claims)?;

        tracing::info!(target: "auth", user_id = %identity, "Signed out");
        self.publish(SessionEvent::SignedOut {
            identity,
        });

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> { self.events.subscribe() }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn provider() -> LocalAuthProvider {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        LocalAuthProvider::new(
            db,
            JwtConfig::from_raw_secret("provider-test-secret-that-is-long-enough", 600),
        )
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let provider = provider();
        let identity = Uuid::new_v4();
        let session = provider.issue(identity, "t@example.com").unwrap();

        assert_eq!(provider.current_identity(&session.token).await, Some(identity));

        let mut events = provider.subscribe();
        provider.sign_out(&session.token).await.unwrap();

        assert_eq!(provider.current_identity(&session.token).await, None);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::SignedOut {
                identity,
            }
        );
        assert!(provider.sign_out(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let provider = provider();
        let identity = Uuid::new_v4();
        let old = provider.issue(identity, "t@example.com").unwrap();

        let new = provider.refresh(&old.token).await.unwrap();

        assert_ne!(old.token, new.token);
        assert_eq!(provider.current_identity(&old.token).await, None);
        assert_eq!(provider.current_identity(&new.token).await, Some(identity));
    }

    #[tokio::test]
    async fn test_garbage_token_has_no_identity() {
        assert_eq!(provider().current_identity("garbage").await, None);
    }

    #[test]
    fn test_event_identity() {
        let id = Uuid::new_v4();
        let event = SessionEvent::RoleChanged {
            identity: id,
        };
        assert_eq!(event.identity(), id);
        assert_eq!(event.kind(), "role_changed");
    }
}
