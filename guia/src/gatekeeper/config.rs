//! Gatekeeper configuration.

use std::time::Duration;

/// Default minimum movement for a full update, in meters.
pub const DEFAULT_DISTANCE_THRESHOLD_M: f64 = 20.0;

/// Default interval after which a full update fires regardless of
/// movement.
pub const DEFAULT_LONG_INTERVAL: Duration = Duration::from_secs(30);

/// Default minimum gap between processed readings.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Accuracy threshold for mobile (GPS-grade) providers, in meters.
pub const MOBILE_ACCURACY_LIMIT_M: f64 = 100.0;

/// Accuracy threshold for desktop (IP/Wi-Fi-grade) providers, in meters.
pub const DESKTOP_ACCURACY_LIMIT_M: f64 = 5_000.0;

/// Acceptable-accuracy profile for the position provider in use.
///
/// Mobile devices report GPS fixes in the tens of meters; desktop
/// browsers fall back to IP or Wi-Fi positioning that is orders of
/// magnitude coarser. The same reading can be fine on one profile and
/// flagged on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccuracyProfile {
    /// GPS-grade provider (phone, tablet).
    #[default]
    Mobile,
    /// IP/Wi-Fi-grade provider (desktop browser).
    Desktop,
}

impl AccuracyProfile {
    /// The accuracy value (meters) above which a reading is flagged.
    pub fn not_acceptable_above_m(&self) -> f64 {
        match self {
            Self::Mobile => MOBILE_ACCURACY_LIMIT_M,
            Self::Desktop => DESKTOP_ACCURACY_LIMIT_M,
        }
    }
}

impl std::fmt::Display for AccuracyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Desktop => write!(f, "desktop"),
        }
    }
}

impl std::str::FromStr for AccuracyProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            other => Err(format!(
                "unknown profile '{}' (expected 'mobile' or 'desktop')",
                other
            )),
        }
    }
}

/// Configuration for the position gatekeeper.
#[derive(Debug, Clone)]
pub struct GatekeeperConfig {
    /// Minimum movement from the last accepted position for a full
    /// update.
    pub distance_threshold_m: f64,

    /// Interval after which a full update fires regardless of movement.
    pub long_interval: Duration,

    /// Readings arriving closer together than this are dropped.
    pub min_interval: Duration,

    /// Accuracy profile for the active provider.
    pub profile: AccuracyProfile,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            distance_threshold_m: DEFAULT_DISTANCE_THRESHOLD_M,
            long_interval: DEFAULT_LONG_INTERVAL,
            min_interval: DEFAULT_MIN_INTERVAL,
            profile: AccuracyProfile::default(),
        }
    }
}
