//! Settings structs for all configuration sections.
//!
//! Pure data types with defaults; parsing and serialization live in
//! [`super::file`].

use std::time::Duration;

use crate::address::store::{DEFAULT_FINGERPRINT_DECIMALS, DEFAULT_MAX_ENTRIES};
use crate::gatekeeper::{AccuracyProfile, GatekeeperConfig};
use crate::geocoder::client::{DEFAULT_HTTP_TIMEOUT, DEFAULT_NOMINATIM_URL};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Gatekeeper settings
    pub gatekeeper: GatekeeperSettings,
    /// Geocoder settings
    pub geocoder: GeocoderSettings,
    /// Address cache settings
    pub cache: CacheSettings,
}

/// Gatekeeper configuration section.
#[derive(Debug, Clone, PartialEq)]
pub struct GatekeeperSettings {
    /// Provider accuracy profile: "mobile" or "desktop"
    pub profile: AccuracyProfile,
    /// Minimum movement for a full update, in meters
    pub distance_threshold_m: f64,
    /// Interval forcing a full update regardless of movement, in seconds
    pub long_interval_secs: u64,
    /// Minimum gap between processed readings, in seconds
    pub min_interval_secs: u64,
}

impl Default for GatekeeperSettings {
    fn default() -> Self {
        let config = GatekeeperConfig::default();
        Self {
            profile: config.profile,
            distance_threshold_m: config.distance_threshold_m,
            long_interval_secs: config.long_interval.as_secs(),
            min_interval_secs: config.min_interval.as_secs(),
        }
    }
}

impl GatekeeperSettings {
    /// Build the runtime gatekeeper configuration.
    pub fn to_config(&self) -> GatekeeperConfig {
        GatekeeperConfig {
            distance_threshold_m: self.distance_threshold_m,
            long_interval: Duration::from_secs(self.long_interval_secs),
            min_interval: Duration::from_secs(self.min_interval_secs),
            profile: self.profile,
        }
    }
}

/// Geocoder configuration section.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    /// Base URL of the Nominatim-compatible service
    pub base_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
        }
    }
}

impl GeocoderSettings {
    /// The configured timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Address cache configuration section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of keyed cache entries
    pub max_entries: usize,
    /// Coordinate fingerprint precision in decimal places
    pub fingerprint_decimals: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            fingerprint_decimals: DEFAULT_FINGERPRINT_DECIMALS,
        }
    }
}
