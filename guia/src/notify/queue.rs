//! Priority notification queue.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex};

use crate::pubsub::{Publisher, SubscriptionId, Subscriber};

/// One scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Text to hand to the speech/logging driver.
    pub text: String,
    /// Scheduling priority; higher dequeues first.
    pub priority: u8,
}

/// Published after every queue mutation.
#[derive(Debug, Clone)]
pub enum QueueEvent {
    /// An item was added.
    Enqueued(Announcement),
    /// An item was removed and handed to the consumer.
    Dequeued(Announcement),
    /// The queue was emptied; carries how many items were dropped.
    Cleared { dropped: usize },
}

/// Heap entry: priority wins, then earlier insertion.
#[derive(Debug, PartialEq, Eq)]
struct QueuedItem {
    announcement: Announcement,
    seq: u64,
}

impl Ord for QueuedItem {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        (self.announcement.priority, Reverse(self.seq))
            .cmp(&(other.announcement.priority, Reverse(other.seq)))
    }
}

impl PartialOrd for QueuedItem {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct QueueState {
    heap: BinaryHeap<QueuedItem>,
    next_seq: u64,
}

/// Priority-ordered notification queue.
///
/// Ordering invariant: across priorities, the highest priority dequeues
/// first; within one priority, items dequeue in insertion order. Every
/// mutation publishes a [`QueueEvent`] to both object and function
/// subscribers.
#[derive(Default)]
pub struct NotificationQueue {
    state: Mutex<QueueState>,
    publisher: Publisher<QueueEvent>,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification, keeping the ordering invariant, and publish
    /// [`QueueEvent::Enqueued`].
    pub fn enqueue(&self, text: impl Into<String>, priority: u8) {
        let announcement = Announcement {
            text: text.into(),
            priority,
        };

        {
            let mut state = self.state.lock().unwrap();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.heap.push(QueuedItem {
                announcement: announcement.clone(),
                seq,
            });
        }

        tracing::debug!(
            text = %announcement.text,
            priority = announcement.priority,
            "Notification enqueued"
        );
        self.publisher.notify(&QueueEvent::Enqueued(announcement));
    }

    /// Remove and return the highest-priority, earliest-enqueued item,
    /// publishing [`QueueEvent::Dequeued`].
    ///
    /// Returns `None` on an empty queue; nothing is published then.
    pub fn dequeue(&self) -> Option<Announcement> {
        let announcement = {
            let mut state = self.state.lock().unwrap();
            state.heap.pop().map(|item| item.announcement)
        }?;

        self.publisher
            .notify(&QueueEvent::Dequeued(announcement.clone()));
        Some(announcement)
    }

    /// The item [`Self::dequeue`] would return, without removing it.
    pub fn peek(&self) -> Option<Announcement> {
        self.state
            .lock()
            .unwrap()
            .heap
            .peek()
            .map(|item| item.announcement.clone())
    }

    /// Empty the queue and publish one [`QueueEvent::Cleared`].
    pub fn clear(&self) {
        let dropped = {
            let mut state = self.state.lock().unwrap();
            let dropped = state.heap.len();
            state.heap.clear();
            dropped
        };

        self.publisher.notify(&QueueEvent::Cleared { dropped });
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().heap.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().heap.is_empty()
    }

    /// Subscribe an object observer to queue events.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber<QueueEvent>>) {
        self.publisher.subscribe(subscriber);
    }

    /// Remove an object observer.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber<QueueEvent>>) -> bool {
        self.publisher.unsubscribe(subscriber)
    }

    /// Subscribe a function observer to queue events.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&QueueEvent) + Send + Sync + 'static,
    {
        self.publisher.subscribe_fn(f)
    }

    /// Remove a function observer.
    pub fn unsubscribe_fn(&self, id: SubscriptionId) -> bool {
        self.publisher.unsubscribe_fn(id)
    }
}
