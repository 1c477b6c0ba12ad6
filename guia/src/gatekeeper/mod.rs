//! Position gatekeeper.
//!
//! The gatekeeper is the pipeline's first stage: it receives raw provider
//! readings, validates them, and decides which ones are significant
//! enough to propagate downstream. One gatekeeper exists per running
//! pipeline; it is constructed by the composition root and shared by
//! `Arc` rather than accessed through a global.
//!
//! # Decision policy
//!
//! A reading produces exactly one of three events:
//!
//! - **FullUpdate** - moved at least the distance threshold from the last
//!   accepted position, or the long interval has elapsed since the last
//!   acceptance. Replaces the reference position and resets the clock.
//! - **LightUpdate** - a fresh reading below the full-update gate.
//!   Downstream consumers may serve it from cache. Does not touch the
//!   reference position, so sub-threshold drift accumulates toward a
//!   future full update.
//! - **NotUpdated** - a stale reading (timestamp not newer than the last
//!   one processed) or one arriving inside the minimum interval.
//!
//! Elapsed time is measured between position timestamps, not against the
//! wall clock: the provider's clock is authoritative for its own
//! readings, and decisions stay deterministic under test.
//!
//! # Accuracy
//!
//! A reading whose reported accuracy is worse than the active profile's
//! threshold is still processed, but the resulting event carries an
//! [`AccuracyError`] so consumers can react (or ignore it) independently.

mod config;
mod event;
mod gate;

pub use config::{AccuracyProfile, GatekeeperConfig};
pub use event::{AccuracyError, PositionEvent, RejectReason};
pub use gate::PositionGatekeeper;
