//! Generic publish/subscribe primitive.
//!
//! Every event-producing component in the pipeline owns a [`Publisher`]
//! over its own closed event type and broadcasts through it. Two kinds of
//! subscriber are supported:
//!
//! - **Object subscribers**: anything implementing [`Subscriber`],
//!   registered as `Arc<dyn Subscriber<E>>` and removed by pointer
//!   identity.
//! - **Function subscribers**: plain closures, registered with
//!   [`Publisher::subscribe_fn`] and removed via the returned
//!   [`SubscriptionId`].
//!
//! # Isolation
//!
//! Each subscriber invocation is wrapped in `catch_unwind`: a panicking
//! subscriber is logged at warn level and the remaining subscribers still
//! run. A publisher's call stack can never be broken by one misbehaving
//! observer.
//!
//! # Re-entrancy
//!
//! Subscriber lists are copy-on-write: `subscribe`/`unsubscribe` replace
//! the list, and `notify` iterates a snapshot taken up front. A callback
//! may therefore subscribe or unsubscribe (even itself) during a
//! notification without corrupting the in-progress iteration; the change
//! takes effect from the next notification.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// An object-style subscriber to events of type `E`.
pub trait Subscriber<E>: Send + Sync {
    /// Handle one published event.
    fn update(&self, event: &E);
}

/// Handle for removing a function subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type FnSubscriber<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Broadcast hub for events of type `E`.
pub struct Publisher<E> {
    subscribers: Mutex<Arc<Vec<Arc<dyn Subscriber<E>>>>>,
    functions: Mutex<Arc<Vec<(u64, FnSubscriber<E>)>>>,
    next_fn_id: AtomicU64,
}

impl<E> Default for Publisher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Publisher<E> {
    /// Create a publisher with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Arc::new(Vec::new())),
            functions: Mutex::new(Arc::new(Vec::new())),
            next_fn_id: AtomicU64::new(0),
        }
    }

    /// Add an object subscriber.
    ///
    /// Subscribing the same `Arc` twice registers it twice; each
    /// registration receives each event once.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<E>>) {
        let mut guard = self.subscribers.lock().unwrap();
        let mut list: Vec<_> = guard.as_ref().clone();
        list.push(subscriber);
        *guard = Arc::new(list);
    }

    /// Remove an object subscriber by pointer identity.
    ///
    /// Returns true if a registration was removed. Only the first
    /// matching registration is removed.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber<E>>) -> bool {
        let mut guard = self.subscribers.lock().unwrap();
        let mut list: Vec<_> = guard.as_ref().clone();
        if let Some(index) = list.iter().position(|s| Arc::ptr_eq(s, subscriber)) {
            list.remove(index);
            *guard = Arc::new(list);
            true
        } else {
            false
        }
    }

    /// Add a function subscriber and return its removal handle.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_fn_id.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.functions.lock().unwrap();
        let mut list: Vec<_> = guard.as_ref().clone();
        list.push((id, Arc::new(f)));
        *guard = Arc::new(list);
        SubscriptionId(id)
    }

    /// Remove a function subscriber.
    ///
    /// Returns true if the subscription existed.
    pub fn unsubscribe_fn(&self, id: SubscriptionId) -> bool {
        let mut guard = self.functions.lock().unwrap();
        let mut list: Vec<_> = guard.as_ref().clone();
        if let Some(index) = list.iter().position(|(fn_id, _)| *fn_id == id.0) {
            list.remove(index);
            *guard = Arc::new(list);
            true
        } else {
            false
        }
    }

    /// Number of registered object subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Number of registered function subscribers.
    pub fn fn_count(&self) -> usize {
        self.functions.lock().unwrap().len()
    }

    /// Broadcast an event to all subscribers.
    ///
    /// Object subscribers are notified first, in subscription order, then
    /// function subscribers. Each invocation is isolated: a panic is
    /// logged and the remaining subscribers still run.
    pub fn notify(&self, event: &E) {
        // Snapshot both lists before invoking anything, so re-entrant
        // subscription changes cannot affect this notification round.
        let subscribers = Arc::clone(&self.subscribers.lock().unwrap());
        let functions = Arc::clone(&self.functions.lock().unwrap());

        for subscriber in subscribers.iter() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| subscriber.update(event))) {
                tracing::warn!(
                    panic = %panic_message(payload.as_ref()),
                    "Subscriber panicked during notification, skipping"
                );
            }
        }

        for (id, f) in functions.iter() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| f(event))) {
                tracing::warn!(
                    subscription_id = *id,
                    panic = %panic_message(payload.as_ref()),
                    "Function subscriber panicked during notification, skipping"
                );
            }
        }
    }
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Recorder {
        seen: Mutex<Vec<u32>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<u32> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Subscriber<u32> for Recorder {
        fn update(&self, event: &u32) {
            self.seen.lock().unwrap().push(*event);
        }
    }

    #[test]
    fn test_notify_reaches_object_subscribers_in_order() {
        let publisher: Publisher<u32> = Publisher::new();
        let first = Recorder::new();
        let second = Recorder::new();

        publisher.subscribe(first.clone());
        publisher.subscribe(second.clone());
        publisher.notify(&7);

        assert_eq!(first.seen(), vec![7]);
        assert_eq!(second.seen(), vec![7]);
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let publisher: Publisher<u32> = Publisher::new();
        let recorder = Recorder::new();
        let as_dyn: Arc<dyn Subscriber<u32>> = recorder.clone();

        publisher.subscribe(recorder.clone());
        assert_eq!(publisher.subscriber_count(), 1);

        assert!(publisher.unsubscribe(&as_dyn));
        assert!(!publisher.unsubscribe(&as_dyn));
        assert_eq!(publisher.subscriber_count(), 0);

        publisher.notify(&1);
        assert!(recorder.seen().is_empty());
    }

    #[test]
    fn test_function_subscribers_receive_events() {
        let publisher: Publisher<u32> = Publisher::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = publisher.subscribe_fn(move |event| {
            count_clone.fetch_add(*event as usize, Ordering::SeqCst);
        });

        publisher.notify(&3);
        publisher.notify(&4);
        assert_eq!(count.load(Ordering::SeqCst), 7);

        assert!(publisher.unsubscribe_fn(id));
        assert!(!publisher.unsubscribe_fn(id));
        publisher.notify(&5);
        assert_eq!(count.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_the_rest() {
        let publisher: Publisher<u32> = Publisher::new();

        publisher.subscribe_fn(|_| panic!("misbehaving subscriber"));

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        publisher.subscribe_fn(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Must not panic, and the second subscriber must still run.
        publisher.notify(&1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_object_subscriber_is_isolated() {
        struct Panicker;
        impl Subscriber<u32> for Panicker {
            fn update(&self, _: &u32) {
                panic!("boom");
            }
        }

        let publisher: Publisher<u32> = Publisher::new();
        let recorder = Recorder::new();
        publisher.subscribe(Arc::new(Panicker));
        publisher.subscribe(recorder.clone());

        publisher.notify(&9);
        assert_eq!(recorder.seen(), vec![9]);
    }

    #[test]
    fn test_reentrant_subscribe_does_not_affect_in_progress_notify() {
        let publisher: Arc<Publisher<u32>> = Arc::new(Publisher::new());
        let count = Arc::new(AtomicUsize::new(0));

        let publisher_clone = publisher.clone();
        let count_clone = count.clone();
        publisher.subscribe_fn(move |_| {
            // Subscribing from within a notification must not make the
            // new subscriber receive the event being delivered.
            let inner_count = count_clone.clone();
            publisher_clone.subscribe_fn(move |_| {
                inner_count.fetch_add(1, Ordering::SeqCst);
            });
        });

        publisher.notify(&1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // The re-entrantly added subscriber sees the next event.
        publisher.notify(&2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_unsubscribe_during_notify() {
        let publisher: Arc<Publisher<u32>> = Arc::new(Publisher::new());
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let later = publisher.subscribe_fn(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let publisher_clone = publisher.clone();
        publisher.subscribe_fn(move |_| {
            publisher_clone.unsubscribe_fn(later);
        });

        // The snapshot taken at notify time still includes `later`.
        publisher.notify(&1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Subsequent notifications do not.
        publisher.notify(&2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
