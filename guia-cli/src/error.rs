//! CLI error types.

use thiserror::Error;

/// Errors surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O failure reading input or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A position line was not valid JSON
    #[error("Invalid position line: {0}")]
    InvalidPosition(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] guia::config::ConfigFileError),

    /// The pipeline could not be assembled
    #[error("Service error: {0}")]
    Service(#[from] guia::service::ServiceError),

    /// A one-shot lookup failed
    #[error("Geocoding error: {0}")]
    Geocode(#[from] guia::geocoder::GeocodeError),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
