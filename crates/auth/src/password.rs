//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored in the PHC-like form
//! `$argon2id$v=19$m=<KiB>,t=<iterations>,p=<lanes>$<salt_b64>$<hash_b64>`.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use rand::{rng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

impl From<PasswordError> for error::AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::VerificationFailed => error::AppError::unauthorized("Invalid email or password"),
            other => error::AppError::internal(other.to_string()),
        }
    }
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 15 MiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost:   u32,
    /// Number of lanes (default: 2)
    pub parallelism: u32,
    /// Length of the generated hash in bytes
    pub hash_length: u32,
    /// Length of the salt in bytes
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 15360,
            time_cost:   3,
            parallelism: 2,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

fn argon2(memory_cost: u32, time_cost: u32, parallelism: u32, output_len: usize) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(output_len))
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `config` - Optional configuration for Argon2id parameters
///
/// # Example
///
/// ```
/// use auth::password::hash_password;
/// use secrecy::SecretString;
///
/// let password = SecretString::from("my_secure_password".to_string());
/// let hash = hash_password(&password, None).unwrap();
/// ```
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    let mut output = vec![0u8; config.hash_length as usize];
    argon2(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        output.len(),
    )?
    .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(SecretString::from(format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        BASE64_STANDARD.encode(&salt),
        BASE64_STANDARD.encode(&output)
    )))
}

/// Reads `key=value` out of the `m=..,t=..,p=..` parameter segment.
fn hash_param(params: &str, key: &str) -> Result<u32, PasswordError> {
    params
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| v.parse().ok())
        .ok_or(PasswordError::InvalidHashFormat)
}

/// Verifies a password against a stored hash.
///
/// The comparison runs in constant time.
///
/// # Example
///
/// ```
/// use auth::password::{hash_password, verify_password};
/// use secrecy::{ExposeSecret, SecretString};
///
/// let password = SecretString::from("my_secure_password".to_string());
/// let hash = hash_password(&password, None).unwrap();
///
/// assert!(verify_password(&password, hash.expose_secret()).is_ok());
/// ```
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    // ["", "argon2id", "v=19", "m=..,t=..,p=..", salt, hash]
    let parts: Vec<&str> = expected_hash.split('$').collect();
    let ["", "argon2id", "v=19", params, salt_b64, hash_b64] = parts.as_slice()
    else {
        return Err(PasswordError::InvalidHashFormat);
    };

    let salt = BASE64_STANDARD.decode(salt_b64)?;
    let stored_hash = BASE64_STANDARD.decode(hash_b64)?;
    if stored_hash.is_empty() {
        return Err(PasswordError::InvalidHashFormat);
    }

    let mut computed_hash = vec![0u8; stored_hash.len()];
    argon2(
        hash_param(params, "m")?,
        hash_param(params, "t")?,
        hash_param(params, "p")?,
        stored_hash.len(),
    )?
    .hash_password_into(
        password.expose_secret().as_bytes(),
        &salt,
        &mut computed_hash,
    )
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    if computed_hash.as_slice().ct_eq(&stored_hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Errors for password validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least 12 characters long")]
    TooShort,

    #[error("Password must be at most 256 characters long")]
    TooLong,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Checks if a password is strong enough.
///
/// # Returns
///
/// Every rule the password breaks, or `Ok(())`.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordValidationError>> {
    let mut errors = Vec::new();
    let length = password.chars().count();

    if length < 12 {
        errors.push(PasswordValidationError::TooShort);
    }
    if length > 256 {
        errors.push(PasswordValidationError::TooLong);
    }
    if !password.chars().any(char::is_uppercase) {
        errors.push(PasswordValidationError::MissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        errors.push(PasswordValidationError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::MissingDigit);
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        errors.push(PasswordValidationError::MissingSpecial);
    }

    if errors.is_empty() {
        Ok(())
    }
    else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Option<PasswordConfig> {
        Some(PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("TestPassword123!".to_string());
        let hash = hash_password(&password, fast()).unwrap();
        assert!(hash.expose_secret().starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(verify_password(&password, hash.expose_secret()).is_ok());
    }

    #[test]
    fn test_default_params_verify() {
        let password = SecretString::from("Passw0rd!-local".to_string());
        let hash = hash_password(&password, None).unwrap();
        assert!(verify_password(&password, hash.expose_secret()).is_ok());
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword".to_string());
        let wrong_password = SecretString::from("WrongPassword".to_string());
        let hash = hash_password(&password, fast()).unwrap();
        assert!(matches!(
            verify_password(&wrong_password, hash.expose_secret()),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let password = SecretString::from("whatever".to_string());
        assert!(matches!(
            verify_password(&password, "plaintext"),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(matches!(
            verify_password(&password, "$argon2id$v=19$m=1024,t=1$c2FsdHNhbHQ$aGFzaA"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password_strength("Passw0rd!-local").is_ok());

        let errors = validate_password_strength("abc").unwrap_err();
        assert!(errors.contains(&PasswordValidationError::TooShort));
        assert!(errors.contains(&PasswordValidationError::MissingDigit));
        assert!(!errors.contains(&PasswordValidationError::MissingLowercase));
    }
}
