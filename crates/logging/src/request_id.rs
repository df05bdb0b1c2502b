//! # Request ID Tracking
//!
//! Identifiers correlating every log line of one HTTP request.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use std::fmt;

/// Header carrying the request ID in and out of the service.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Accept a caller-supplied ID if it looks like one we would have issued.
    ///
    /// IDs must be 16 to 64 characters of alphanumerics, `-` or `_`.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let well_formed = (16 ..= 64).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if well_formed {
            Some(Self(value.to_string()))
        }
        else {
            None
        }
    }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_from_header_accepts_generated_ids() {
        let id = RequestId::new();
        assert_eq!(RequestId::from_header(id.as_str()), Some(id));
    }

    #[test]
    fn test_from_header_rejects_garbage() {
        assert!(RequestId::from_header("short").is_none());
        assert!(RequestId::from_header("invalid!@#invalid!@#").is_none());
        assert!(RequestId::from_header(&"a".repeat(65)).is_none());
    }

    #[test]
    fn test_display() {
        let id = RequestId::new();
        assert_eq!(id.to_string(), id.as_str());
    }
}
