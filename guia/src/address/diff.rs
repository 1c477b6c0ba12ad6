//! Pure change detection between address snapshots.

use super::snapshot::StandardizedAddress;

/// A standardized field the detector can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Municipality,
    State,
    Neighborhood,
    Street,
    Country,
    PostalCode,
}

/// The fields whose changes drive announcements.
pub const ANNOUNCED_FIELDS: [TrackedField; 3] = [
    TrackedField::Municipality,
    TrackedField::Neighborhood,
    TrackedField::Street,
];

impl TrackedField {
    /// Read this field's value from an address.
    pub fn value<'a>(&self, address: &'a StandardizedAddress) -> Option<&'a str> {
        match self {
            Self::Municipality => address.municipality.as_deref(),
            Self::State => address.state.as_deref(),
            Self::Neighborhood => address.neighborhood.as_deref(),
            Self::Street => address.street.as_deref(),
            Self::Country => address.country.as_deref(),
            Self::PostalCode => address.postal_code.as_deref(),
        }
    }

    /// Stable lowercase name, used as the registry key and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::State => "state",
            Self::Neighborhood => "neighborhood",
            Self::Street => "street",
            Self::Country => "country",
            Self::PostalCode => "postal_code",
        }
    }
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One detected field change.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Which field changed.
    pub field: TrackedField,
    /// Value in the previous snapshot.
    pub old: Option<String>,
    /// Value in the current snapshot.
    pub new: Option<String>,
}

/// Compare two addresses over the given fields.
///
/// Returns one [`FieldChange`] per field whose value differs (by value,
/// not identity), in the order the fields were given. Equal inputs
/// always produce an empty vector. Pure: no I/O, no side effects.
pub fn diff(
    previous: &StandardizedAddress,
    current: &StandardizedAddress,
    fields: &[TrackedField],
) -> Vec<FieldChange> {
    fields
        .iter()
        .filter_map(|field| {
            let old = field.value(previous);
            let new = field.value(current);
            if old != new {
                Some(FieldChange {
                    field: *field,
                    old: old.map(str::to_string),
                    new: new.map(str::to_string),
                })
            } else {
                None
            }
        })
        .collect()
}
