//! Guia - position-triggered reverse-geocoding announcement pipeline.
//!
//! This library tracks a moving observer's position, decides when a
//! change is significant, resolves significant positions into
//! human-readable addresses, detects which address components actually
//! changed, and schedules priority-ordered announcements about those
//! changes.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides the assembled
//! pipeline:
//!
//! ```ignore
//! use guia::config::ConfigFile;
//! use guia::position::RawPosition;
//! use guia::service::GuiaService;
//!
//! let config = ConfigFile::load()?;
//! let service = GuiaService::new(&config)?;
//!
//! service.submit(&RawPosition::new(-23.5505, -46.6333, 10.0, now_ms))?;
//!
//! // Later, from the consumer side:
//! while let Some(announcement) = service.next_announcement() {
//!     speak(&announcement.text);
//! }
//! ```
//!
//! # Pipeline
//!
//! Raw reading → [`gatekeeper`] → [`geocoder`] → [`address`] cache →
//! [`notify`] queue → external consumer.

pub mod address;
pub mod config;
pub mod gatekeeper;
pub mod geocoder;
pub mod logging;
pub mod notify;
pub mod position;
pub mod pubsub;
pub mod service;

/// Version of the guia library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
