//! The assembled pipeline.

use std::sync::Arc;

use crate::address::AddressCache;
use crate::config::ConfigFile;
use crate::gatekeeper::{PositionEvent, PositionGatekeeper};
use crate::geocoder::{GeocodeClient, NominatimClient, ReverseGeocoder};
use crate::notify::{Announcement, Announcer, AnnouncerConfig, NotificationQueue};
use crate::position::{PositionError, RawPosition};

use super::error::ServiceError;

/// The wired pipeline: gatekeeper → geocoder → address cache →
/// announcer → notification queue.
///
/// Raw readings go in through [`GuiaService::submit`]; announcements
/// come out through [`GuiaService::next_announcement`] (or any consumer
/// holding the queue handle). Resolution happens on spawned tasks, so
/// the service must live inside a Tokio runtime.
pub struct GuiaService<C: GeocodeClient + 'static> {
    gatekeeper: Arc<PositionGatekeeper>,
    geocoder: ReverseGeocoder<C>,
    cache: Arc<AddressCache>,
    queue: Arc<NotificationQueue>,
    _announcer: Announcer,
}

impl GuiaService<NominatimClient> {
    /// Assemble a pipeline over the configured Nominatim service.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the HTTP client cannot be built.
    pub fn new(config: &ConfigFile) -> Result<Self, ServiceError> {
        let client = NominatimClient::new(config.geocoder.base_url.clone(), config.geocoder.timeout())?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: GeocodeClient + 'static> GuiaService<C> {
    /// Assemble a pipeline over a custom geocoding client.
    ///
    /// This is the seam tests (and alternative providers) use.
    pub fn with_client(config: &ConfigFile, client: C) -> Self {
        let gatekeeper = Arc::new(PositionGatekeeper::with_config(
            config.gatekeeper.to_config(),
        ));
        let cache = Arc::new(AddressCache::new(
            config.cache.max_entries,
            config.cache.fingerprint_decimals,
        ));
        let queue = Arc::new(NotificationQueue::new());

        let geocoder = ReverseGeocoder::new(client);
        geocoder.set_lookup(cache.clone());
        geocoder.subscribe(cache.clone());
        gatekeeper.subscribe(Arc::new(geocoder.clone()));

        let announcer = Announcer::attach(&cache, queue.clone(), AnnouncerConfig::default());

        tracing::info!(
            profile = %config.gatekeeper.profile,
            geocoder = %config.geocoder.base_url,
            cache_entries = config.cache.max_entries,
            "Pipeline assembled"
        );

        Self {
            gatekeeper,
            geocoder,
            cache,
            queue,
            _announcer: announcer,
        }
    }

    /// Feed one raw reading into the pipeline.
    ///
    /// Returns the gatekeeper's decision; resolution and announcement
    /// happen asynchronously on spawned tasks.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] for malformed readings.
    pub fn submit(&self, raw: &RawPosition) -> Result<PositionEvent, PositionError> {
        self.gatekeeper.submit(raw)
    }

    /// Take the next announcement, highest priority first.
    pub fn next_announcement(&self) -> Option<Announcement> {
        self.queue.dequeue()
    }

    /// The announcement the consumer would get next, without taking it.
    pub fn peek_announcement(&self) -> Option<Announcement> {
        self.queue.peek()
    }

    /// The pipeline's gatekeeper.
    pub fn gatekeeper(&self) -> &Arc<PositionGatekeeper> {
        &self.gatekeeper
    }

    /// The pipeline's reverse geocoder.
    pub fn geocoder(&self) -> &ReverseGeocoder<C> {
        &self.geocoder
    }

    /// The pipeline's address cache.
    pub fn address_cache(&self) -> &Arc<AddressCache> {
        &self.cache
    }

    /// The pipeline's notification queue.
    pub fn queue(&self) -> &Arc<NotificationQueue> {
        &self.queue
    }
}
