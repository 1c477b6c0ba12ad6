//! Geocoding client trait and Nominatim implementation.
//!
//! The [`GeocodeClient`] trait abstracts over reverse-geocoding
//! services, so the resolver works against any provider (and tests work
//! against canned payloads). The [`NominatimClient`] implementation
//! queries an OpenStreetMap Nominatim-compatible endpoint via `reqwest`.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use super::error::GeocodeError;

/// Default public Nominatim endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default HTTP timeout for reverse-geocoding lookups.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for resolving coordinates into a raw address payload.
///
/// One call issues one lookup. Implementations do not deduplicate or
/// cancel earlier calls; the resolver layers its own staleness handling
/// on top.
pub trait GeocodeClient: Send + Sync {
    /// Resolve a coordinate pair into the provider's raw JSON payload.
    fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Value, GeocodeError>> + Send;
}

/// Nominatim client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling, a request
/// timeout and a versioned user agent (Nominatim usage policy requires
/// one).
pub struct NominatimClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Base URL of the Nominatim-compatible service.
    base_url: String,
}

impl NominatimClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("guia/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Create a client for the public Nominatim endpoint.
    pub fn public() -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_NOMINATIM_URL.to_string(), DEFAULT_HTTP_TIMEOUT)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl GeocodeClient for NominatimClient {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Value, GeocodeError> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, latitude, longitude
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        let payload: Value =
            serde_json::from_slice(&bytes).map_err(|e| GeocodeError::Json(e.to_string()))?;

        tracing::debug!(
            lat = format!("{:.6}", latitude),
            lon = format!("{:.6}", longitude),
            has_address = payload.get("address").is_some(),
            "Reverse geocoding response received"
        );

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::StandardizedAddress;

    #[test]
    fn test_client_creation() {
        let client = NominatimClient::public().unwrap();
        assert_eq!(client.base_url(), DEFAULT_NOMINATIM_URL);
    }

    #[test]
    fn test_response_payload_standardizes() {
        // A trimmed real-world Nominatim reverse response.
        let json = r#"{
            "place_id": 107656004,
            "licence": "Data © OpenStreetMap contributors, ODbL 1.0",
            "lat": "-23.5613073",
            "lon": "-46.6565442",
            "display_name": "Avenida Paulista, Bela Vista, São Paulo, SP, Brasil",
            "address": {
                "road": "Avenida Paulista",
                "suburb": "Bela Vista",
                "city": "São Paulo",
                "state": "São Paulo",
                "postcode": "01310-100",
                "country": "Brasil",
                "country_code": "br"
            },
            "boundingbox": ["-23.5614", "-23.5612", "-46.6567", "-46.6563"]
        }"#;

        let payload: Value = serde_json::from_str(json).unwrap();
        let address = StandardizedAddress::from_nominatim(&payload);

        assert_eq!(address.street.as_deref(), Some("Avenida Paulista"));
        assert_eq!(address.neighborhood.as_deref(), Some("Bela Vista"));
        assert_eq!(address.municipality.as_deref(), Some("São Paulo"));
        assert_eq!(address.country.as_deref(), Some("Brasil"));
    }

    #[test]
    fn test_error_payload_is_still_json() {
        // Nominatim reports unresolvable coordinates inside a 200 body.
        let json = r#"{"error": "Unable to geocode"}"#;
        let payload: Value = serde_json::from_str(json).unwrap();
        let address = StandardizedAddress::from_nominatim(&payload);
        assert!(address.is_empty());
    }
}
