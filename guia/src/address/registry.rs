//! Per-field change callbacks.
//!
//! Consumers interested in one specific field (say, neighborhood
//! changes) register a callback here instead of filtering the full
//! cache-update event stream. Invocation is isolated per callback: one
//! failing callback is logged and the rest still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::diff::{FieldChange, TrackedField};

/// Handle for removing a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type ChangeCallback = Arc<dyn Fn(&FieldChange) + Send + Sync>;

/// Thread-safe registry mapping tracked fields to callbacks.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: DashMap<TrackedField, Vec<(u64, ChangeCallback)>>,
    next_id: AtomicU64,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one field.
    pub fn register<F>(&self, field: TrackedField, callback: F) -> CallbackId
    where
        F: Fn(&FieldChange) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .entry(field)
            .or_default()
            .push((id, Arc::new(callback)));
        CallbackId(id)
    }

    /// Remove a callback.
    ///
    /// Returns true if the callback was registered for that field.
    pub fn unregister(&self, field: TrackedField, id: CallbackId) -> bool {
        let Some(mut entry) = self.callbacks.get_mut(&field) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|(callback_id, _)| *callback_id != id.0);
        before != entry.len()
    }

    /// Number of callbacks registered for a field.
    pub fn count(&self, field: TrackedField) -> usize {
        self.callbacks.get(&field).map(|v| v.len()).unwrap_or(0)
    }

    /// Invoke every callback registered for the change's field.
    ///
    /// Callbacks run in registration order. A panicking callback is
    /// logged at warn level and never reaches the caller or blocks the
    /// remaining callbacks.
    pub fn invoke(&self, change: &FieldChange) {
        // Snapshot before invoking so a callback may (un)register
        // without deadlocking against the shard lock.
        let callbacks: Vec<(u64, ChangeCallback)> = match self.callbacks.get(&change.field) {
            Some(entry) => entry.value().clone(),
            None => return,
        };

        for (id, callback) in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(change))).is_err() {
                tracing::warn!(
                    field = %change.field,
                    callback_id = id,
                    "Field callback panicked, skipping"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn neighborhood_change(old: &str, new: &str) -> FieldChange {
        FieldChange {
            field: TrackedField::Neighborhood,
            old: Some(old.to_string()),
            new: Some(new.to_string()),
        }
    }

    #[test]
    fn test_invoke_calls_matching_callbacks_only() {
        let registry = CallbackRegistry::new();
        let neighborhood_hits = Arc::new(AtomicUsize::new(0));
        let street_hits = Arc::new(AtomicUsize::new(0));

        let hits = neighborhood_hits.clone();
        registry.register(TrackedField::Neighborhood, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        let hits = street_hits.clone();
        registry.register(TrackedField::Street, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        registry.invoke(&neighborhood_change("Bela Vista", "Centro"));

        assert_eq!(neighborhood_hits.load(Ordering::SeqCst), 1);
        assert_eq!(street_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_receives_old_and_new_values() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = seen.clone();
        registry.register(TrackedField::Neighborhood, move |change| {
            *seen_clone.lock().unwrap() = Some((change.old.clone(), change.new.clone()));
        });

        registry.invoke(&neighborhood_change("Bela Vista", "Centro"));

        let value = seen.lock().unwrap().clone().unwrap();
        assert_eq!(value.0.as_deref(), Some("Bela Vista"));
        assert_eq!(value.1.as_deref(), Some("Centro"));
    }

    #[test]
    fn test_unregister() {
        let registry = CallbackRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        let id = registry.register(TrackedField::Neighborhood, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.count(TrackedField::Neighborhood), 1);

        assert!(registry.unregister(TrackedField::Neighborhood, id));
        assert!(!registry.unregister(TrackedField::Neighborhood, id));
        assert_eq!(registry.count(TrackedField::Neighborhood), 0);

        registry.invoke(&neighborhood_change("a", "b"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unregister_wrong_field_is_noop() {
        let registry = CallbackRegistry::new();
        let id = registry.register(TrackedField::Neighborhood, |_| {});
        assert!(!registry.unregister(TrackedField::Street, id));
        assert_eq!(registry.count(TrackedField::Neighborhood), 1);
    }

    #[test]
    fn test_panicking_callback_does_not_block_the_rest() {
        let registry = CallbackRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.register(TrackedField::Neighborhood, |_| {
            panic!("misbehaving callback");
        });
        let hits_clone = hits.clone();
        registry.register(TrackedField::Neighborhood, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Must not panic; the second callback still runs.
        registry.invoke(&neighborhood_change("a", "b"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invoke_with_no_callbacks_is_noop() {
        let registry = CallbackRegistry::new();
        registry.invoke(&neighborhood_change("a", "b"));
    }
}
