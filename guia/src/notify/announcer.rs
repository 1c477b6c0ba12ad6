//! Turns address changes into spoken-style announcements.
//!
//! The announcer registers one callback per announced field on the
//! address cache; each change is phrased in Portuguese and enqueued with
//! a per-field priority, municipality highest (entering a new city
//! matters more than turning a corner).

use std::sync::Arc;

use crate::address::{AddressCache, CallbackId, FieldChange, TrackedField};

use super::queue::NotificationQueue;

/// Per-field announcement priorities.
#[derive(Debug, Clone)]
pub struct AnnouncerConfig {
    /// Priority for municipality changes.
    pub municipality_priority: u8,
    /// Priority for neighborhood changes.
    pub neighborhood_priority: u8,
    /// Priority for street changes.
    pub street_priority: u8,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            municipality_priority: 3,
            neighborhood_priority: 2,
            street_priority: 1,
        }
    }
}

impl AnnouncerConfig {
    fn priority(&self, field: TrackedField) -> u8 {
        match field {
            TrackedField::Municipality => self.municipality_priority,
            TrackedField::Neighborhood => self.neighborhood_priority,
            TrackedField::Street => self.street_priority,
            // Non-announced fields share the lowest priority.
            _ => self.street_priority,
        }
    }
}

/// Bridges address-change callbacks to the notification queue.
///
/// Holds its registrations so they can be released with
/// [`Announcer::detach`]; dropping the announcer without detaching
/// leaves the callbacks registered (they only borrow the queue, which
/// they keep alive through an `Arc`).
pub struct Announcer {
    registrations: Vec<(TrackedField, CallbackId)>,
}

impl Announcer {
    /// Register announcement callbacks on a cache.
    pub fn attach(
        cache: &AddressCache,
        queue: Arc<NotificationQueue>,
        config: AnnouncerConfig,
    ) -> Self {
        let fields = [
            TrackedField::Municipality,
            TrackedField::Neighborhood,
            TrackedField::Street,
        ];

        let registrations = fields
            .into_iter()
            .map(|field| {
                let queue = queue.clone();
                let config = config.clone();
                let id = cache.register_callback(field, move |change| {
                    if let Some(text) = phrase(change) {
                        queue.enqueue(text, config.priority(change.field));
                    }
                });
                (field, id)
            })
            .collect();

        Self { registrations }
    }

    /// Remove this announcer's callbacks from the cache.
    pub fn detach(&mut self, cache: &AddressCache) {
        for (field, id) in self.registrations.drain(..) {
            cache.unregister_callback(field, id);
        }
    }
}

/// Phrase one change in Portuguese.
///
/// A change whose new value is absent (the observer left a known area
/// for an unnamed one) produces nothing to announce.
fn phrase(change: &FieldChange) -> Option<String> {
    let new = change.new.as_deref()?;
    match change.field {
        TrackedField::Municipality => Some(format!("Você entrou em {}", new)),
        TrackedField::Neighborhood => Some(format!("Você entrou no bairro {}", new)),
        TrackedField::Street => Some(format!("Você está na {}", new)),
        _ => None,
    }
}
