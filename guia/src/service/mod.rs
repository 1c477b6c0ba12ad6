//! Service facade and composition root.
//!
//! [`GuiaService`] is where the pipeline is assembled: it constructs the
//! gatekeeper, reverse geocoder, address cache, notification queue and
//! announcer exactly once, wires the subscriptions between them, and
//! hands out references. Components never reach for globals - everything
//! they collaborate with is injected here.

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::GuiaService;
