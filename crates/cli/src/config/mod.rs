//! # CLI Configuration
//!
//! Turns parsed arguments into the configuration types the library crates
//! expect.

use std::net::SocketAddr;

use auth::JwtConfig;
use base64::Engine as _;
use error::{AppError, Result};
use migration::DatabaseConfig;

use crate::commands::{DatabaseArgs, JwtArgs};

/// Minimum decoded length of the JWT signing secret.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Database settings from the environment, with the command-line URL taking
/// precedence.
pub fn database_config(args: &DatabaseArgs) -> DatabaseConfig {
    let config = DatabaseConfig::from_env();
    match &args.database_url {
        Some(url) if !url.trim().is_empty() => config.with_url(url.trim()),
        _ => config,
    }
}

/// Builds the token signing configuration.
///
/// # Errors
///
/// Returns a config error when the secret is missing, is not base64, or is
/// shorter than [`MIN_JWT_SECRET_BYTES`].
pub fn jwt_config(args: &JwtArgs) -> Result<JwtConfig> {
    let secret = args
        .jwt_secret
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::config("CONDUCTA_JWT_SECRET must be set"))?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(secret)
        .map_err(|e| AppError::config(format!("CONDUCTA_JWT_SECRET is not valid base64: {}", e)))?;
    if decoded.len() < MIN_JWT_SECRET_BYTES {
        return Err(AppError::config(format!(
            "CONDUCTA_JWT_SECRET must decode to at least {} bytes",
            MIN_JWT_SECRET_BYTES
        )));
    }

    if args.jwt_expiration == 0 {
        return Err(AppError::config("CONDUCTA_JWT_EXPIRATION must be positive"));
    }

    Ok(JwtConfig {
        secret:             secret.to_string(),
        expiration_seconds: args.jwt_expiration,
        issuer:             args.jwt_issuer.clone(),
        audience:           args.jwt_audience.clone(),
    })
}

/// Parses a host and port into a SocketAddr.
///
/// IPv6 hosts may be given with or without brackets.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let addr = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr.parse()
        .map_err(|e| AppError::config(format!("Invalid address {}: {}", addr, e)))
}
