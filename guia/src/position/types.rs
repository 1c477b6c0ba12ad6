//! Core position types.

use serde::Deserialize;
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when validating a raw position reading.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PositionError {
    /// The reading carries no coordinates at all.
    #[error("Position is missing latitude/longitude")]
    MissingCoordinates,

    /// The reading carries no timestamp.
    #[error("Position is missing a timestamp")]
    MissingTimestamp,

    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// Raw position payload as delivered by a geolocation provider.
///
/// All fields are optional: providers differ in what they supply, and a
/// malformed reading must be representable so it can be rejected with a
/// precise [`PositionError`] instead of failing deserialization.
///
/// Timestamps are epoch milliseconds, matching the browser Geolocation
/// API's `DOMTimeStamp`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPosition {
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Measurement accuracy in meters (lower is better).
    pub accuracy: Option<f64>,
    /// Altitude in meters, if the provider supplies it.
    pub altitude: Option<f64>,
    /// Heading in degrees (0-360), if moving.
    pub heading: Option<f64>,
    /// Ground speed in meters per second, if moving.
    pub speed: Option<f64>,
    /// When the reading was taken (epoch milliseconds).
    pub timestamp: Option<u64>,
}

impl RawPosition {
    /// Convenience constructor for a minimal reading.
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: u64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: Some(accuracy),
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point. Callers are expected to pass validated values.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A validated position reading.
///
/// Constructed once per raw input via [`Position::from_raw`] and never
/// mutated. Coordinates are guaranteed to be in range and a timestamp is
/// guaranteed to be present; the remaining fields are carried through
/// as-is from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Measurement accuracy in meters, when reported.
    pub accuracy: Option<f64>,
    /// Altitude in meters, when reported.
    pub altitude: Option<f64>,
    /// Heading in degrees, when reported.
    pub heading: Option<f64>,
    /// Ground speed in meters per second, when reported.
    pub speed: Option<f64>,
    /// When the reading was taken (epoch milliseconds).
    pub timestamp: u64,
}

impl Position {
    /// Validate a raw provider reading.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] when the timestamp or either
    /// coordinate is missing, or when a coordinate is out of range.
    pub fn from_raw(raw: &RawPosition) -> Result<Self, PositionError> {
        let (latitude, longitude) = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(PositionError::MissingCoordinates),
        };
        let timestamp = raw.timestamp.ok_or(PositionError::MissingTimestamp)?;

        if !(MIN_LAT..=MAX_LAT).contains(&latitude) || !latitude.is_finite() {
            return Err(PositionError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) || !longitude.is_finite() {
            return Err(PositionError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
            accuracy: raw.accuracy,
            altitude: raw.altitude,
            heading: raw.heading,
            speed: raw.speed,
            timestamp,
        })
    }

    /// The reading's coordinates as a [`GeoPoint`].
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
