//! Events published by the gatekeeper.

use crate::position::Position;

/// Non-fatal accuracy complaint attached to an otherwise-accepted update.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyError {
    /// Accuracy the provider reported, in meters.
    pub measured_m: f64,
    /// The profile threshold that was exceeded, in meters.
    pub limit_m: f64,
}

impl std::fmt::Display for AccuracyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reported accuracy {:.0} m exceeds the acceptable {:.0} m",
            self.measured_m, self.limit_m
        )
    }
}

/// Why a reading did not update the gatekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Timestamp not newer than the last processed reading.
    Stale,
    /// Arrived inside the configured minimum interval.
    TooRecent,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stale => write!(f, "stale or duplicate reading"),
            Self::TooRecent => write!(f, "update too recent"),
        }
    }
}

/// Outcome of submitting one reading to the gatekeeper.
///
/// Consumed through exhaustive matching; there is no other way a
/// position change reaches the rest of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// Significant movement (or enough elapsed time): downstream
    /// consumers should re-resolve from scratch.
    FullUpdate {
        /// The newly accepted position.
        position: Position,
        /// Set when the reading's accuracy exceeds the profile limit.
        accuracy_error: Option<AccuracyError>,
    },

    /// A fresh reading below the full-update gate: downstream consumers
    /// may take the cheap path (e.g. serve a cached address).
    LightUpdate {
        /// The new reading (the gatekeeper's reference position is
        /// unchanged).
        position: Position,
        /// Set when the reading's accuracy exceeds the profile limit.
        accuracy_error: Option<AccuracyError>,
    },

    /// The reading was dropped.
    NotUpdated {
        /// The reading that was dropped.
        position: Position,
        /// Why it was dropped.
        reason: RejectReason,
    },
}

impl PositionEvent {
    /// The position carried by this event.
    pub fn position(&self) -> &Position {
        match self {
            Self::FullUpdate { position, .. }
            | Self::LightUpdate { position, .. }
            | Self::NotUpdated { position, .. } => position,
        }
    }

    /// Short event-kind label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FullUpdate { .. } => "full",
            Self::LightUpdate { .. } => "light",
            Self::NotUpdated { .. } => "not-updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, RawPosition};

    fn position() -> Position {
        Position::from_raw(&RawPosition::new(-23.5505, -46.6333, 10.0, 1000)).unwrap()
    }

    #[test]
    fn test_accuracy_error_display() {
        let error = AccuracyError {
            measured_m: 350.0,
            limit_m: 100.0,
        };
        let text = error.to_string();
        assert!(text.contains("350"));
        assert!(text.contains("100"));
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::Stale.to_string(), "stale or duplicate reading");
        assert_eq!(RejectReason::TooRecent.to_string(), "update too recent");
    }

    #[test]
    fn test_event_kind_labels() {
        let full = PositionEvent::FullUpdate {
            position: position(),
            accuracy_error: None,
        };
        let light = PositionEvent::LightUpdate {
            position: position(),
            accuracy_error: None,
        };
        let dropped = PositionEvent::NotUpdated {
            position: position(),
            reason: RejectReason::Stale,
        };

        assert_eq!(full.kind(), "full");
        assert_eq!(light.kind(), "light");
        assert_eq!(dropped.kind(), "not-updated");
        assert_eq!(full.position().latitude, -23.5505);
    }
}
