//! Reverse geocoding.
//!
//! Converts accepted position updates into resolved addresses. The
//! [`ReverseGeocoder`] plays both pub/sub roles at once, as two composed
//! capabilities rather than one blurred type:
//!
//! - **Subscriber** to the gatekeeper's position events: full updates
//!   trigger a network resolution, light updates probe the address cache
//!   first, rejected readings are ignored.
//! - **Publisher** of [`AddressEvent`]s: every resolution attempt ends
//!   in exactly one terminal event - `Resolved`, `Failed` or
//!   `Superseded`.
//!
//! # Out-of-order completions
//!
//! Nothing serializes outbound lookups: a slow response for an old
//! position can arrive after a fast response for a newer one. Every
//! resolution draws a monotonically increasing request id and records it
//! as the latest issued; a completion whose id is no longer the latest
//! publishes `Superseded` instead of its result, so a stale address can
//! never overwrite a newer one downstream. In-flight requests are not
//! actively cancelled - their results are discarded on arrival.
//!
//! # Components
//!
//! - [`client`] - the [`GeocodeClient`] trait and the Nominatim-style
//!   HTTP implementation
//! - [`event`] - the [`AddressEvent`] tagged union
//! - [`resolver`] - the [`ReverseGeocoder`] itself

pub mod client;
mod error;
mod event;
mod resolver;

pub use client::{GeocodeClient, NominatimClient};
pub use error::GeocodeError;
pub use event::AddressEvent;
pub use resolver::ReverseGeocoder;
