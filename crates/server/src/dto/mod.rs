//! # Data Transfer Objects Module
//!
//! Request and response types for the screen endpoints.

pub mod auth;
pub mod catalog;
pub mod incidents;
pub mod students;
pub mod users;

use serde::Serialize;
use validator::ValidationError;

/// Rejects strings that are empty once trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Envelope for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub total:   usize,
    pub items:   Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            success: true,
            total: items.len(),
            items,
        }
    }
}
