//! # Rejection Conversions
//!
//! Maps Axum extractor rejections onto [`AppError`] so malformed bodies and
//! query strings render in the standard error format.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

/// Pulls the field name out of serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let start = message.find("missing field `")? + "missing field `".len();
    let len = message[start ..].find('`')?;
    Some(&message[start .. start + len])
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => {
                let message = missing_field(&text)
                    .map(|field| format!("Missing required field: {}", field))
                    .unwrap_or(text);
                AppError::validation(message)
            },
            _ => AppError::bad_request(text),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_extraction() {
        assert_eq!(
            missing_field("Failed to deserialize: missing field `student_id` at line 1 column 2"),
            Some("student_id")
        );
        assert_eq!(missing_field("expected value at line 1"), None);
    }
}
