//! Service error types.

use thiserror::Error;

use crate::config::ConfigFileError;

/// Errors that can occur while assembling or running the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let config_error = ConfigFileError::WriteError("disk full".to_string());
        let service_error: ServiceError = config_error.into();
        assert!(matches!(service_error, ServiceError::Config(_)));
        assert!(service_error.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_trait() {
        let error = ServiceError::Config(ConfigFileError::WriteError("x".to_string()));
        let _: &dyn std::error::Error = &error;
    }
}
