//! The reverse geocoder: position-event subscriber, address-event
//! publisher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::address::{AddressLookup, StandardizedAddress};
use crate::gatekeeper::PositionEvent;
use crate::position::GeoPoint;
use crate::pubsub::{Publisher, SubscriptionId, Subscriber};

use super::client::GeocodeClient;
use super::event::AddressEvent;

struct GeocoderInner<C> {
    client: C,
    publisher: Publisher<AddressEvent>,
    /// Cache probe for the light path; installed by the composition
    /// root once the address cache exists.
    lookup: Mutex<Option<Arc<dyn AddressLookup>>>,
    next_id: AtomicU64,
    latest_issued: AtomicU64,
}

/// Resolves accepted positions into addresses.
///
/// Cheaply clonable handle around shared state, so the same geocoder can
/// be registered as a gatekeeper subscriber and still be driven directly
/// (e.g. by tests or a one-shot CLI command).
///
/// As a `Subscriber<PositionEvent>` this type spawns its resolutions
/// onto the current Tokio runtime; `update` must therefore be invoked
/// from within one.
pub struct ReverseGeocoder<C: GeocodeClient> {
    inner: Arc<GeocoderInner<C>>,
}

impl<C: GeocodeClient> Clone for ReverseGeocoder<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: GeocodeClient> ReverseGeocoder<C> {
    /// Create a geocoder over the given client.
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(GeocoderInner {
                client,
                publisher: Publisher::new(),
                lookup: Mutex::new(None),
                next_id: AtomicU64::new(0),
                latest_issued: AtomicU64::new(0),
            }),
        }
    }

    /// Install the cache probe used by [`Self::resolve_light`].
    pub fn set_lookup(&self, lookup: Arc<dyn AddressLookup>) {
        *self.inner.lookup.lock().unwrap() = Some(lookup);
    }

    /// Subscribe an object observer to address events.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<AddressEvent>>) {
        self.inner.publisher.subscribe(subscriber);
    }

    /// Remove an object observer.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber<AddressEvent>>) -> bool {
        self.inner.publisher.unsubscribe(subscriber)
    }

    /// Subscribe a function observer to address events.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&AddressEvent) + Send + Sync + 'static,
    {
        self.inner.publisher.subscribe_fn(f)
    }

    /// Remove a function observer.
    pub fn unsubscribe_fn(&self, id: SubscriptionId) -> bool {
        self.inner.publisher.unsubscribe_fn(id)
    }

    /// Draw the next request id and mark it as the latest issued.
    fn issue_request(&self) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        // fetch_max, not store: a concurrent resolve may already have
        // drawn a higher id and recorded it.
        self.inner.latest_issued.fetch_max(id, Ordering::SeqCst);
        id
    }

    /// Resolve a point over the network.
    ///
    /// Publishes exactly one terminal [`AddressEvent`] and returns the
    /// attempt's request id. A completion that is no longer the latest
    /// issued attempt publishes `Superseded` instead of its result.
    pub async fn resolve(&self, point: GeoPoint) -> u64 {
        let id = self.issue_request();
        tracing::debug!(request_id = id, point = %point, "Resolving address");

        let result = self
            .inner
            .client
            .reverse(point.latitude, point.longitude)
            .await;

        let event = if self.inner.latest_issued.load(Ordering::SeqCst) != id {
            tracing::debug!(request_id = id, "Resolution superseded by a newer request");
            AddressEvent::Superseded { request_id: id }
        } else {
            match result {
                Ok(raw) => {
                    let address = StandardizedAddress::from_nominatim(&raw);
                    AddressEvent::Resolved {
                        request_id: id,
                        point,
                        raw,
                        address,
                        cached: false,
                    }
                }
                Err(error) => {
                    tracing::warn!(request_id = id, error = %error, "Resolution failed");
                    AddressEvent::Failed {
                        request_id: id,
                        point,
                        error,
                    }
                }
            }
        };

        self.inner.publisher.notify(&event);
        id
    }

    /// Resolve a point, preferring the address cache.
    ///
    /// The cheap path for light updates: a fingerprint hit republishes
    /// the cached snapshot (marked `cached`) without touching the
    /// network; a miss falls through to [`Self::resolve`].
    pub async fn resolve_light(&self, point: GeoPoint) -> u64 {
        let lookup = self.inner.lookup.lock().unwrap().clone();
        if let Some(lookup) = lookup {
            if let Some(snapshot) = lookup.lookup(point) {
                let id = self.issue_request();
                tracing::debug!(request_id = id, point = %point, "Resolved from cache");
                self.inner.publisher.notify(&AddressEvent::Resolved {
                    request_id: id,
                    point,
                    raw: snapshot.raw.clone(),
                    address: snapshot.standardized.clone(),
                    cached: true,
                });
                return id;
            }
        }

        self.resolve(point).await
    }
}

impl<C: GeocodeClient + 'static> Subscriber<PositionEvent> for ReverseGeocoder<C> {
    fn update(&self, event: &PositionEvent) {
        match event {
            PositionEvent::FullUpdate { position, .. } => {
                let geocoder = self.clone();
                let point = position.point();
                tokio::spawn(async move {
                    geocoder.resolve(point).await;
                });
            }
            PositionEvent::LightUpdate { position, .. } => {
                let geocoder = self.clone();
                let point = position.point();
                tokio::spawn(async move {
                    geocoder.resolve_light(point).await;
                });
            }
            PositionEvent::NotUpdated { .. } => {}
        }
    }
}
