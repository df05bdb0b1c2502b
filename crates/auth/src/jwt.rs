//! # JWT Token Management
//!
//! Session tokens carry the user's identity (`sub`) and a unique token id
//! (`jti`) used for revocation on sign-out.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use cuid2::CuidConstructor;
use error::{AppError, Result};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret:             String,
    /// Token lifetime in seconds
    pub expiration_seconds: u64,
    pub issuer:             String,
    pub audience:           String,
}

impl JwtConfig {
    /// Builds a config from a raw secret, encoding it to base64.
    pub fn from_raw_secret(secret: &str, expiration_seconds: u64) -> Self {
        use base64::Engine;

        Self {
            secret: base64::engine::general_purpose::STANDARD.encode(secret),
            expiration_seconds,
            issuer: "conducta".to_string(),
            audience: "conducta".to_string(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub:   String,
    pub email: String,
    pub iss:   String,
    pub aud:   String,
    /// Expiration time (Unix timestamp)
    pub exp:   u64,
    /// Issued at (Unix timestamp)
    pub iat:   u64,
    /// Unique token ID
    pub jti:   String,
}

impl Claims {
    /// The identity the token was issued for.
    ///
    /// # Errors
    ///
    /// Returns `JwtInvalidToken` when `sub` is not a UUID.
    pub fn identity(&self) -> Result<Uuid> { Uuid::parse_str(&self.sub).map_err(|_| AppError::JwtInvalidToken) }
}

fn now() -> Result<Duration> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))
}

/// Creates a new JWT access token
///
/// # Arguments
///
/// * `config` - JWT configuration
/// * `user_id` - The user's identity
/// * `email` - The user's email address
///
/// # Errors
///
/// Returns an error if the secret is not valid base64 or encoding fails.
pub fn create_access_token(config: &JwtConfig, user_id: Uuid, email: &str) -> Result<String> {
    let now = now()?;

    let claims = Claims {
        sub:   user_id.to_string(),
        email: email.to_string(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   (now + Duration::from_secs(config.expiration_seconds)).as_secs(),
        iat:   now.as_secs(),
        jti:   CuidConstructor::new().with_length(32).create_id(),
    };

    let key = EncodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    jsonwebtoken::encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims
///
/// # Errors
///
/// * `JwtExpired` - the token is past its `exp`
/// * `JwtInvalidSignature` - the token was signed with another key
/// * `JwtInvalidToken` - anything else (malformed, wrong issuer or audience)
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::JwtExpired,
                ErrorKind::InvalidSignature => AppError::JwtInvalidSignature,
                _ => AppError::JwtInvalidToken,
            }
        })
}

/// Extracts the Bearer token from the Authorization header
///
/// # Returns
///
/// The token string if present, or None if missing/invalid.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
