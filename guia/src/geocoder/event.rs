//! Events published by the reverse geocoder.

use serde_json::Value;

use crate::address::StandardizedAddress;
use crate::position::GeoPoint;

use super::error::GeocodeError;

/// Terminal outcome of one resolution attempt.
///
/// Every call to the resolver publishes exactly one of these.
#[derive(Debug, Clone)]
pub enum AddressEvent {
    /// The coordinates resolved to an address.
    Resolved {
        /// Sequence number of the resolution attempt.
        request_id: u64,
        /// The coordinates that were resolved.
        point: GeoPoint,
        /// Opaque provider payload.
        raw: Value,
        /// Standardized components.
        address: StandardizedAddress,
        /// True when served from the address cache without a network
        /// round trip.
        cached: bool,
    },

    /// The lookup failed; no address is available for this attempt.
    Failed {
        /// Sequence number of the resolution attempt.
        request_id: u64,
        /// The coordinates that failed to resolve.
        point: GeoPoint,
        /// What went wrong.
        error: GeocodeError,
    },

    /// The lookup completed after a newer one was issued; its result was
    /// discarded.
    Superseded {
        /// Sequence number of the superseded attempt.
        request_id: u64,
    },
}

impl AddressEvent {
    /// The attempt's sequence number.
    pub fn request_id(&self) -> u64 {
        match self {
            Self::Resolved { request_id, .. }
            | Self::Failed { request_id, .. }
            | Self::Superseded { request_id } => *request_id,
        }
    }

    /// Short event-kind label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolved { .. } => "resolved",
            Self::Failed { .. } => "failed",
            Self::Superseded { .. } => "superseded",
        }
    }
}
