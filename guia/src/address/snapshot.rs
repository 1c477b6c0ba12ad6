//! Address snapshots and payload standardization.
//!
//! Reverse-geocoding providers return locale-specific component keys
//! (`city` vs `town` vs `village`, `suburb` vs `neighbourhood`, and so
//! on). [`StandardizedAddress`] flattens those into a fixed set of six
//! fields so the rest of the pipeline never touches provider JSON; the
//! untouched payload rides along in [`AddressSnapshot::raw`] for
//! consumers that want more.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Municipality fallback keys, in preference order.
const MUNICIPALITY_KEYS: &[&str] = &["city", "town", "village", "municipality"];

/// Neighborhood fallback keys, in preference order.
const NEIGHBORHOOD_KEYS: &[&str] = &["suburb", "neighbourhood", "city_district"];

/// Street fallback keys, in preference order.
const STREET_KEYS: &[&str] = &["road", "pedestrian", "footway"];

/// Standardized address components.
///
/// Every field is optional: rural coordinates may resolve without a
/// street, open water without anything at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizedAddress {
    /// City/town/village.
    pub municipality: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Neighborhood/suburb/district.
    pub neighborhood: Option<String>,
    /// Street name.
    pub street: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
}

impl StandardizedAddress {
    /// Standardize a raw Nominatim-style payload.
    ///
    /// Missing or non-object `address` members yield an empty (all-None)
    /// address rather than an error: a thin payload is a data condition,
    /// not a failure.
    pub fn from_nominatim(payload: &Value) -> Self {
        let address = payload.get("address");

        let pick = |keys: &[&str]| -> Option<String> {
            let address = address?;
            keys.iter()
                .find_map(|key| address.get(*key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            municipality: pick(MUNICIPALITY_KEYS),
            state: pick(&["state"]),
            neighborhood: pick(NEIGHBORHOOD_KEYS),
            street: pick(STREET_KEYS),
            country: pick(&["country"]),
            postal_code: pick(&["postcode"]),
        }
    }

    /// True when no component was resolved.
    pub fn is_empty(&self) -> bool {
        self.municipality.is_none()
            && self.state.is_none()
            && self.neighborhood.is_none()
            && self.street.is_none()
            && self.country.is_none()
            && self.postal_code.is_none()
    }
}

impl std::fmt::Display for StandardizedAddress {
    /// Comma-joined non-empty components, street first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [
            self.street.as_deref(),
            self.neighborhood.as_deref(),
            self.municipality.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            write!(f, "(unresolved)")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// One resolved address: the provider payload plus its standardization.
///
/// Snapshots are immutable; the store replaces them and keeps the
/// previous one for change detection.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSnapshot {
    /// Opaque provider payload, untouched.
    pub raw: Value,
    /// Standardized components.
    pub standardized: StandardizedAddress,
}

impl AddressSnapshot {
    /// Create a snapshot from a raw payload and its standardization.
    pub fn new(raw: Value, standardized: StandardizedAddress) -> Self {
        Self { raw, standardized }
    }

    /// Create a snapshot by standardizing a raw payload.
    pub fn from_payload(raw: Value) -> Self {
        let standardized = StandardizedAddress::from_nominatim(&raw);
        Self { raw, standardized }
    }
}
