//! Address cache facade.
//!
//! Composes the snapshot store, the change detector and the callback
//! registry behind one entry point, [`AddressCache::accept`], and
//! publishes a [`CacheUpdate`] event after every accepted resolution.
//!
//! One cache exists per running pipeline; the composition root creates
//! it and shares it by `Arc`. It plays two subscriber-side roles:
//!
//! - `Subscriber<AddressEvent>` - wired to the reverse geocoder, so
//!   resolutions flow in without the geocoder knowing the concrete type.
//! - [`AddressLookup`] - the probe the geocoder uses to skip a network
//!   round trip on light updates.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::geocoder::AddressEvent;
use crate::position::GeoPoint;
use crate::pubsub::{Publisher, SubscriptionId, Subscriber};

use super::diff::{diff, FieldChange, ANNOUNCED_FIELDS};
use super::registry::{CallbackId, CallbackRegistry};
use super::snapshot::{AddressSnapshot, StandardizedAddress};
use super::store::{AddressStore, CoordKey, DEFAULT_FINGERPRINT_DECIMALS, DEFAULT_MAX_ENTRIES};
use super::TrackedField;

/// Published after every accepted resolution.
///
/// `changes` is empty when the new snapshot is field-equal to the
/// previous one (or when it is the first snapshot); field callbacks only
/// fire for non-empty change lists, but the event itself is always
/// published so monitors see every acceptance.
#[derive(Debug, Clone)]
pub struct CacheUpdate {
    /// Where the resolved address applies.
    pub point: GeoPoint,
    /// The snapshot that is now current.
    pub snapshot: Arc<AddressSnapshot>,
    /// Field changes relative to the previous snapshot.
    pub changes: Vec<FieldChange>,
}

/// Cache probe used by the reverse geocoder's light path.
pub trait AddressLookup: Send + Sync {
    /// A previously resolved snapshot for this point's fingerprint.
    fn lookup(&self, point: GeoPoint) -> Option<Arc<AddressSnapshot>>;
}

/// Facade over snapshot storage, change detection and field callbacks.
pub struct AddressCache {
    store: Mutex<AddressStore>,
    registry: CallbackRegistry,
    publisher: Publisher<CacheUpdate>,
    fingerprint_decimals: u32,
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_FINGERPRINT_DECIMALS)
    }
}

impl AddressCache {
    /// Create a cache bounded at `max_entries`, fingerprinting at
    /// `fingerprint_decimals` decimal places.
    pub fn new(max_entries: usize, fingerprint_decimals: u32) -> Self {
        Self {
            store: Mutex::new(AddressStore::new(max_entries)),
            registry: CallbackRegistry::new(),
            publisher: Publisher::new(),
            fingerprint_decimals,
        }
    }

    /// Accept a resolved address for a point.
    ///
    /// Rotates current → previous, stores the new snapshot (logical and
    /// keyed), detects changes over the announced fields, fires field
    /// callbacks per change and publishes one [`CacheUpdate`]. Returns
    /// the change list.
    ///
    /// The first accepted snapshot establishes the baseline: with no
    /// previous snapshot there is nothing to compare against, so no
    /// changes are reported and no callbacks fire.
    pub fn accept(
        &self,
        point: GeoPoint,
        raw: Value,
        standardized: StandardizedAddress,
    ) -> Vec<FieldChange> {
        let snapshot = Arc::new(AddressSnapshot::new(raw, standardized));

        let (previous, changes) = {
            let mut store = self.store.lock().unwrap();
            let previous = store.current();
            store.set_current(snapshot.clone());
            store.put(
                CoordKey::from_point(point, self.fingerprint_decimals),
                snapshot.clone(),
            );

            let changes = match &previous {
                Some(prev) => diff(&prev.standardized, &snapshot.standardized, &ANNOUNCED_FIELDS),
                None => Vec::new(),
            };
            (previous, changes)
        };

        if previous.is_none() {
            tracing::info!(
                address = %snapshot.standardized,
                "First address resolved, baseline established"
            );
        } else if changes.is_empty() {
            tracing::debug!(address = %snapshot.standardized, "Address unchanged");
        } else {
            tracing::info!(
                address = %snapshot.standardized,
                changed = ?changes.iter().map(|c| c.field.name()).collect::<Vec<_>>(),
                "Address changed"
            );
        }

        for change in &changes {
            self.registry.invoke(change);
        }

        self.publisher.notify(&CacheUpdate {
            point,
            snapshot,
            changes: changes.clone(),
        });

        changes
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<Arc<AddressSnapshot>> {
        self.store.lock().unwrap().current()
    }

    /// The previous snapshot.
    pub fn previous(&self) -> Option<Arc<AddressSnapshot>> {
        self.store.lock().unwrap().previous()
    }

    /// Number of keyed cache entries.
    pub fn cached_entries(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Register a callback for one field's changes.
    pub fn register_callback<F>(&self, field: TrackedField, callback: F) -> CallbackId
    where
        F: Fn(&FieldChange) + Send + Sync + 'static,
    {
        self.registry.register(field, callback)
    }

    /// Remove a field callback.
    pub fn unregister_callback(&self, field: TrackedField, id: CallbackId) -> bool {
        self.registry.unregister(field, id)
    }

    /// Subscribe an object observer to cache updates.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<CacheUpdate>>) {
        self.publisher.subscribe(subscriber);
    }

    /// Remove an object observer.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber<CacheUpdate>>) -> bool {
        self.publisher.unsubscribe(subscriber)
    }

    /// Subscribe a function observer to cache updates.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&CacheUpdate) + Send + Sync + 'static,
    {
        self.publisher.subscribe_fn(f)
    }

    /// Remove a function observer.
    pub fn unsubscribe_fn(&self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe_fn(id)
    }
}

impl AddressLookup for AddressCache {
    fn lookup(&self, point: GeoPoint) -> Option<Arc<AddressSnapshot>> {
        let key = CoordKey::from_point(point, self.fingerprint_decimals);
        self.store.lock().unwrap().get(&key)
    }
}

impl Subscriber<AddressEvent> for AddressCache {
    fn update(&self, event: &AddressEvent) {
        match event {
            AddressEvent::Resolved {
                point,
                raw,
                address,
                ..
            } => {
                self.accept(*point, raw.clone(), address.clone());
            }
            AddressEvent::Failed { point, error, .. } => {
                tracing::warn!(point = %point, error = %error, "Address resolution failed");
            }
            AddressEvent::Superseded { request_id } => {
                tracing::debug!(request_id, "Discarded superseded address resolution");
            }
        }
    }
}
