//! Position types and geographic math.
//!
//! This module defines the fundamental position types used throughout the
//! pipeline:
//!
//! - [`RawPosition`] - Untrusted provider payload (all fields optional)
//! - [`Position`] - Validated, immutable position reading
//! - [`GeoPoint`] - Plain latitude/longitude pair
//! - [`PositionError`] - Validation failures at the provider boundary
//!
//! A geolocation provider delivers [`RawPosition`] values; the gatekeeper
//! promotes them to [`Position`] via [`Position::from_raw`], which is the
//! only constructor and the single place where coordinate ranges and
//! required fields are checked. Once constructed, a [`Position`] is never
//! mutated - "updating" always means replacing the held value.
//!
//! Distance between two points is computed with the haversine formula in
//! [`geo`].

pub mod geo;
mod types;

pub use geo::haversine_distance_m;
pub use types::{
    GeoPoint, Position, PositionError, RawPosition, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};
