//! # Error Traits
//!
//! Extension methods for attaching context to fallible results and for
//! turning missing rows into `NotFound`.

use crate::{AppError, Result};

/// Adds a context prefix while converting into [`AppError`].
pub trait ResultExt<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }
}

/// Lookups that return `Option` when the row is absent.
pub trait OptionExt<T> {
    /// `NotFound` with the message "`what` not found".
    fn or_not_found(self, what: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, what: &str) -> Result<T> {
        self.ok_or_else(|| AppError::not_found(format!("{} not found", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_message() {
        let result: Result<i32> = Err(AppError::not_found("Category"));
        let err = result.context("Creating incident").unwrap_err();
        assert_eq!(
            err.to_string(),
            "NotFound: Creating incident: Category"
        );
    }

    #[test]
    fn test_context_converts_foreign_errors() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Reading seed file").unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_or_not_found() {
        assert_eq!(Some(7).or_not_found("Student").unwrap(), 7);

        let err = None::<i32>.or_not_found("Student").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.message(), "Student not found");
    }
}
