//! Snapshot storage: logical current/previous plus a bounded LRU cache.
//!
//! The two halves serve different consumers:
//!
//! - `current`/`previous` feed change detection - they track the
//!   observer's address over time, independent of where the observer is.
//! - The keyed cache avoids duplicate lookups - it remembers which
//!   coordinate fingerprints have already been resolved, evicting the
//!   least recently used entry when full.
//!
//! Recency is a monotonically increasing access counter rather than a
//! wall-clock time: strictly ordered, so eviction is deterministic and
//! ties cannot arise.

use std::collections::HashMap;
use std::sync::Arc;

use crate::position::GeoPoint;

use super::snapshot::AddressSnapshot;

/// Default maximum number of keyed cache entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default fingerprint precision in decimal places (~11 m at 4).
pub const DEFAULT_FINGERPRINT_DECIMALS: u32 = 4;

/// Coordinate fingerprint: lat/lon rounded to a fixed number of decimal
/// places and scaled to integers, so nearby readings share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_scaled: i64,
    lon_scaled: i64,
}

impl CoordKey {
    /// Fingerprint a point at the given precision.
    pub fn from_point(point: GeoPoint, decimals: u32) -> Self {
        let scale = 10_f64.powi(decimals as i32);
        Self {
            lat_scaled: (point.latitude * scale).round() as i64,
            lon_scaled: (point.longitude * scale).round() as i64,
        }
    }
}

struct StoreEntry {
    snapshot: Arc<AddressSnapshot>,
    last_accessed: u64,
}

/// Address snapshot store.
///
/// Plain single-owner struct: callers that share it (the cache facade)
/// provide the locking.
pub struct AddressStore {
    current: Option<Arc<AddressSnapshot>>,
    previous: Option<Arc<AddressSnapshot>>,
    entries: HashMap<CoordKey, StoreEntry>,
    max_entries: usize,
    access_clock: u64,
}

impl AddressStore {
    /// Create a store bounded at `max_entries` keyed cache entries.
    ///
    /// A bound of zero disables the keyed cache entirely.
    pub fn new(max_entries: usize) -> Self {
        Self {
            current: None,
            previous: None,
            entries: HashMap::new(),
            max_entries,
            access_clock: 0,
        }
    }

    /// Install a new current snapshot, demoting the old one to previous.
    pub fn set_current(&mut self, snapshot: Arc<AddressSnapshot>) {
        self.previous = self.current.take();
        self.current = Some(snapshot);
    }

    /// The logical current snapshot.
    pub fn current(&self) -> Option<Arc<AddressSnapshot>> {
        self.current.clone()
    }

    /// The logical previous snapshot.
    pub fn previous(&self) -> Option<Arc<AddressSnapshot>> {
        self.previous.clone()
    }

    /// Insert or update a keyed cache entry, marking it most recently
    /// used. Evicts the least recently used entry if the bound is
    /// exceeded.
    pub fn put(&mut self, key: CoordKey, snapshot: Arc<AddressSnapshot>) {
        if self.max_entries == 0 {
            return;
        }

        self.access_clock += 1;
        let last_accessed = self.access_clock;
        self.entries.insert(
            key,
            StoreEntry {
                snapshot,
                last_accessed,
            },
        );

        if self.entries.len() > self.max_entries {
            self.evict_lru();
        }
    }

    /// Look up a keyed cache entry, marking it most recently used.
    ///
    /// An access refreshes recency but is not a change: it never touches
    /// current/previous.
    pub fn get(&mut self, key: &CoordKey) -> Option<Arc<AddressSnapshot>> {
        self.access_clock += 1;
        let clock = self.access_clock;
        let entry = self.entries.get_mut(key)?;
        entry.last_accessed = clock;
        Some(entry.snapshot.clone())
    }

    /// Whether the keyed cache holds this fingerprint.
    pub fn contains(&self, key: &CoordKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keyed cache entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the keyed cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured entry bound.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn evict_lru(&mut self) {
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| *key)
        {
            self.entries.remove(&key);
            tracing::debug!(?key, "Evicted least recently used address entry");
        }
    }
}
