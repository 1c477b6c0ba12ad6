//! Error types for reverse geocoding.

use thiserror::Error;

/// Errors that can occur while resolving a coordinate pair.
///
/// Carried inside [`super::AddressEvent::Failed`], so the variants own
/// their message strings and the whole enum stays cheaply clonable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeocodeError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Reverse geocoding service returned status {0}")]
    Status(u16),

    /// The response body was not the JSON we expect.
    #[error("Failed to parse response: {0}")]
    Json(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert!(GeocodeError::Http("connection refused".to_string())
            .to_string()
            .contains("connection refused"));
        assert!(GeocodeError::Status(503).to_string().contains("503"));
        assert!(GeocodeError::Json("expected object".to_string())
            .to_string()
            .contains("expected object"));
    }
}
