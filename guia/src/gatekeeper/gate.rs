//! The gatekeeper itself.

use std::sync::{Arc, Mutex};

use crate::position::{haversine_distance_m, Position, PositionError, RawPosition};
use crate::pubsub::{Publisher, SubscriptionId, Subscriber};

use super::config::GatekeeperConfig;
use super::event::{AccuracyError, PositionEvent, RejectReason};

/// Mutable gate state, all updated under one lock.
#[derive(Default)]
struct GateState {
    /// Last position accepted by a full update (the distance reference).
    last_position: Option<Position>,
    /// Timestamp of the last full update (epoch ms).
    last_accepted_ms: Option<u64>,
    /// Timestamp of the last processed reading, full or light (epoch ms).
    last_seen_ms: Option<u64>,
}

/// Filters raw position readings and publishes [`PositionEvent`]s.
pub struct PositionGatekeeper {
    state: Mutex<GateState>,
    publisher: Publisher<PositionEvent>,
    config: GatekeeperConfig,
}

impl Default for PositionGatekeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionGatekeeper {
    /// Create a gatekeeper with default configuration.
    pub fn new() -> Self {
        Self::with_config(GatekeeperConfig::default())
    }

    /// Create a gatekeeper with custom configuration.
    pub fn with_config(config: GatekeeperConfig) -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            publisher: Publisher::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }

    /// Subscribe an object observer to position events.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<PositionEvent>>) {
        self.publisher.subscribe(subscriber);
    }

    /// Remove an object observer.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber<PositionEvent>>) -> bool {
        self.publisher.unsubscribe(subscriber)
    }

    /// Subscribe a function observer to position events.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&PositionEvent) + Send + Sync + 'static,
    {
        self.publisher.subscribe_fn(f)
    }

    /// Remove a function observer.
    pub fn unsubscribe_fn(&self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe_fn(id)
    }

    /// The last position accepted by a full update, if any.
    pub fn last_position(&self) -> Option<Position> {
        self.state.lock().unwrap().last_position.clone()
    }

    /// Submit one raw reading.
    ///
    /// Validates the reading, decides its significance, publishes the
    /// resulting [`PositionEvent`] to all subscribers and returns it.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] for malformed input (missing
    /// timestamp/coordinates, out-of-range values). Nothing is published
    /// and the gate state is unchanged in that case.
    pub fn submit(&self, raw: &RawPosition) -> Result<PositionEvent, PositionError> {
        let position = match Position::from_raw(raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed position reading");
                return Err(e);
            }
        };

        let event = {
            let mut state = self.state.lock().unwrap();
            self.decide(&mut state, position)
        };

        match &event {
            PositionEvent::FullUpdate { position, accuracy_error } => {
                tracing::info!(
                    lat = format!("{:.6}", position.latitude),
                    lon = format!("{:.6}", position.longitude),
                    accuracy_flagged = accuracy_error.is_some(),
                    "Position accepted (full update)"
                );
            }
            PositionEvent::LightUpdate { position, .. } => {
                tracing::debug!(
                    lat = format!("{:.6}", position.latitude),
                    lon = format!("{:.6}", position.longitude),
                    "Position accepted (light update)"
                );
            }
            PositionEvent::NotUpdated { reason, .. } => {
                tracing::debug!(reason = %reason, "Position not updated");
            }
        }

        self.publisher.notify(&event);
        Ok(event)
    }

    /// Classify a validated reading and update gate state accordingly.
    fn decide(&self, state: &mut GateState, position: Position) -> PositionEvent {
        if let Some(last_seen) = state.last_seen_ms {
            if position.timestamp <= last_seen {
                return PositionEvent::NotUpdated {
                    position,
                    reason: RejectReason::Stale,
                };
            }
        }

        let elapsed_ms = state
            .last_accepted_ms
            .map(|accepted| position.timestamp.saturating_sub(accepted));
        let distance_m = state
            .last_position
            .as_ref()
            .map(|last| haversine_distance_m(last.point(), position.point()))
            .unwrap_or(0.0);

        let accuracy_error = self.check_accuracy(&position);

        // No prior acceptance behaves like an infinite elapsed interval.
        let long_elapsed = match elapsed_ms {
            None => true,
            Some(ms) => ms >= self.config.long_interval.as_millis() as u64,
        };

        if distance_m >= self.config.distance_threshold_m || long_elapsed {
            state.last_position = Some(position.clone());
            state.last_accepted_ms = Some(position.timestamp);
            state.last_seen_ms = Some(position.timestamp);
            return PositionEvent::FullUpdate {
                position,
                accuracy_error,
            };
        }

        // The burst throttle measures from the last processed reading,
        // not the last acceptance: a 10 Hz provider still yields at most
        // one light update per min_interval.
        let gap_ms = state
            .last_seen_ms
            .map(|seen| position.timestamp.saturating_sub(seen))
            .unwrap_or(u64::MAX);
        if gap_ms < self.config.min_interval.as_millis() as u64 {
            return PositionEvent::NotUpdated {
                position,
                reason: RejectReason::TooRecent,
            };
        }

        state.last_seen_ms = Some(position.timestamp);
        PositionEvent::LightUpdate {
            position,
            accuracy_error,
        }
    }

    /// Flag readings whose accuracy exceeds the profile threshold.
    ///
    /// A reading that reports no accuracy figure passes: there is
    /// nothing to judge.
    fn check_accuracy(&self, position: &Position) -> Option<AccuracyError> {
        let measured = position.accuracy?;
        let limit = self.config.profile.not_acceptable_above_m();
        if measured > limit {
            Some(AccuracyError {
                measured_m: measured,
                limit_m: limit,
            })
        } else {
            None
        }
    }
}
