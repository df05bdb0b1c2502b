//! # Conducta Error Infrastructure
//!
//! Error taxonomy and HTTP error rendering for the Conducta services.
//!
//! Every fallible operation in the workspace returns [`Result`], and every
//! variant of [`AppError`] knows its HTTP status, its stable error code, and,
//! for the two access-control failures, where the client should be sent next.

pub mod rejection;
pub mod response;
pub mod traits;

pub use response::{ErrorBody, SuccessResponse};
pub use traits::{OptionExt, ResultExt};

/// Path unauthenticated viewers are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Base destination every authenticated role may reach.
pub const BASE_PATH: &str = "/incidents";

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    /// No identity, or an identity that resolves to no user row.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("JwtExpired: Token has expired")]
    JwtExpired,

    #[error("JwtInvalidSignature: Invalid token signature")]
    JwtInvalidSignature,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    /// Identity present but the role is below the destination's tier.
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    /// The data store rejected a write (unique key, foreign key, dependents).
    #[error("ConstraintViolation: {message}")]
    ConstraintViolation {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    /// Connection-level failure talking to the data store. Never retried.
    #[error("Unavailable: {message}")]
    Unavailable {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

/// Seed operation result
#[derive(Debug, Clone)]
pub struct SeedResult {
    /// Number of records inserted
    pub inserted_count: usize,
    /// Number of records left untouched because they already existed
    pub skipped_count:  usize,
    /// Seed name for logging
    pub seed_name:      String,
    /// Duration of the seed operation in milliseconds
    pub duration_ms:    u64,
    /// Any errors that occurred
    pub errors:         Vec<String>,
}

impl SeedResult {
    /// Creates a new successful seed result
    #[must_use]
    pub fn success(seed_name: &str, inserted: usize, skipped: usize, duration_ms: u64) -> Self {
        Self {
            inserted_count: inserted,
            skipped_count: skipped,
            seed_name: seed_name.to_string(),
            duration_ms,
            errors: Vec::new(),
        }
    }

    /// Creates a result for a seed that had nothing to do
    #[must_use]
    pub fn noop(seed_name: &str) -> Self { Self::success(seed_name, 0, 0, 0) }

    /// Creates a new failed seed result
    #[must_use]
    pub fn with_error(seed_name: &str, error: &str) -> Self {
        Self {
            inserted_count: 0,
            skipped_count:  0,
            seed_name:      seed_name.to_string(),
            duration_ms:    0,
            errors:         vec![error.to_string()],
        }
    }

    /// Returns true if the seed operation was successful
    #[must_use]
    pub fn is_success(&self) -> bool { self.errors.is_empty() }
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized (unauthenticated) error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden (insufficient role) error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a constraint violation error.
    #[inline]
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an unavailable error.
    #[inline]
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            }
            | AppError::JwtExpired
            | AppError::JwtInvalidSignature
            | AppError::JwtInvalidToken => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::ConstraintViolation {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable {
                ..
            } => http::StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal {
                ..
            }
            | AppError::Database {
                ..
            }
            | AppError::Io {
                ..
            }
            | AppError::Config {
                ..
            }
            | AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::JwtExpired => "JWT_EXPIRED",
            AppError::JwtInvalidSignature => "JWT_INVALID_SIGNATURE",
            AppError::JwtInvalidToken => "JWT_INVALID_TOKEN",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::ConstraintViolation {
                ..
            } => "CONSTRAINT_VIOLATION",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::Unavailable {
                ..
            } => "SERVICE_UNAVAILABLE",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// The free-text message carried by the variant, if it has one.
    fn detail(&self) -> Option<&str> {
        match self {
            AppError::JwtExpired | AppError::JwtInvalidSignature | AppError::JwtInvalidToken => None,
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::ConstraintViolation {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::Unavailable {
                message,
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Io {
                message,
            }
            | AppError::Config {
                message,
            }
            | AppError::Migration {
                message,
            } => Some(message.as_str()),
        }
    }

    fn detail_mut(&mut self) -> Option<&mut String> {
        match self {
            AppError::JwtExpired | AppError::JwtInvalidSignature | AppError::JwtInvalidToken => None,
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::ConstraintViolation {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::Unavailable {
                message,
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Io {
                message,
            }
            | AppError::Config {
                message,
            }
            | AppError::Migration {
                message,
            } => Some(message),
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::JwtExpired => "Token has expired".to_string(),
            AppError::JwtInvalidSignature => "Invalid token signature".to_string(),
            AppError::JwtInvalidToken => "Invalid token".to_string(),
            other => other.detail().unwrap_or_default().to_string(),
        }
    }

    /// Where a client should navigate after this error, if anywhere.
    ///
    /// Unauthenticated requests go to the login screen. Authenticated
    /// requests that lack the required role are sent back to the base
    /// destination rather than shown an error page.
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized {
                ..
            }
            | AppError::JwtExpired
            | AppError::JwtInvalidSignature
            | AppError::JwtInvalidToken => Some(LOGIN_PATH),
            AppError::Forbidden {
                ..
            } => Some(BASE_PATH),
            _ => None,
        }
    }

    /// Returns true for server-side failures that should be logged at error level.
    pub fn is_server_error(&self) -> bool { self.status().is_server_error() }

    /// Prefixes the message with `context`. JWT errors carry no free text
    /// and are returned unchanged.
    #[inline]
    pub fn context(mut self, context: impl ToString) -> Self {
        if let Some(message) = self.detail_mut() {
            *message = format!("{}: {}", context.to_string(), message);
        }
        self
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
///
/// Unique and foreign-key violations become [`AppError::ConstraintViolation`],
/// connection failures become [`AppError::Unavailable`], and missing rows on
/// update become [`AppError::NotFound`].
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, SqlErr};

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return Self::ConstraintViolation {
                    message: format!("Duplicate value: {}", detail),
                }
            },
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return Self::ConstraintViolation {
                    message: format!("Referenced row missing or still in use: {}", detail),
                }
            },
            _ => {},
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                Self::Unavailable {
                    message: err.to_string(),
                }
            },
            DbErr::RecordNotFound(message) => {
                Self::NotFound {
                    message,
                }
            },
            DbErr::RecordNotUpdated => {
                Self::NotFound {
                    message: "Record not found".to_string(),
                }
            },
            other => {
                Self::Database {
                    message: other.to_string(),
                }
            },
        }
    }
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        messages.sort();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    #[test]
    fn test_error_not_found() {
        let err = AppError::not_found("Student");
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("NotFound"));
        assert_eq!(err.redirect_to(), None);
    }

    #[test]
    fn test_error_unauthorized_redirects_to_login() {
        let err = AppError::unauthorized("No session");
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.redirect_to(), Some(LOGIN_PATH));
        assert_eq!(AppError::JwtExpired.redirect_to(), Some(LOGIN_PATH));
    }

    #[test]
    fn test_error_forbidden_redirects_to_base() {
        let err = AppError::forbidden("Coordinator role required");
        assert_eq!(err.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.redirect_to(), Some(BASE_PATH));
    }

    #[test]
    fn test_error_constraint() {
        let err = AppError::constraint("Group has students");
        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_error_unavailable() {
        let err = AppError::unavailable("connection refused");
        assert_eq!(err.status(), http::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_validation() {
        let err = AppError::validation("Invalid format");
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_error_context() {
        let err = AppError::not_found("Group").context("Updating student");
        assert_eq!(err.message(), "Updating student: Group");
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_jwt_context_is_unchanged() {
        let err = AppError::JwtExpired.context("Refreshing");
        assert_eq!(err.message(), "Token has expired");
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("Test error").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "seed.sql");
        let err: AppError = io_err.into();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_from_db_conn_error_is_unavailable() {
        let err: AppError = DbErr::Conn(RuntimeErr::Internal("connection reset".into())).into();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }

    #[test]
    fn test_from_db_record_not_found() {
        let err: AppError = DbErr::RecordNotFound("incident".into()).into();
        assert!(matches!(err, AppError::NotFound { .. }));
        let err: AppError = DbErr::RecordNotUpdated.into();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_from_db_other_is_database() {
        let err: AppError = DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_seed_result() {
        let result = SeedResult::success("roles", 3, 0, 12);
        assert_eq!(result.inserted_count, 3);
        assert!(result.is_success());

        let noop = SeedResult::noop("sql_script");
        assert_eq!(noop.inserted_count, 0);
        assert!(noop.is_success());

        let failed = SeedResult::with_error("roles", "boom");
        assert!(!failed.is_success());
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct NamedThing {
            #[validate(length(min = 1, message = "Name is required"))]
            name: String,
        }

        let errors = NamedThing {
            name: String::new(),
        }
        .validate()
        .unwrap_err();
        let app_error: AppError = errors.into();

        assert_eq!(app_error.message(), "Name is required");
        assert_eq!(app_error.code(), "VALIDATION_ERROR");
    }
}
