//! Ordered lists that announce every change.
//!
//! Each subscriber gets its own unbounded queue, so a burst of pushes (a
//! whole feed applied at once) is delivered in full, one event per push.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

/// A change made to an [`ObservableList`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    /// Every item was removed.
    Cleared,
    /// `item` was appended at `index`.
    Pushed {
        /// Position of the new item.
        index: usize,
        /// The new item.
        item: T,
    },
}

/// A `Vec` that emits a [`ListEvent`] for each clear and each push.
#[derive(Debug)]
pub struct ObservableList<T> {
    name: &'static str,
    items: Vec<T>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ListEvent<T>>>>,
}

impl<T: Clone + Send + 'static> ObservableList<T> {
    /// Create an empty list. `name` labels its events in log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::new(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Append one item and announce it.
    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.items.push(item.clone());
        self.announce(&ListEvent::Pushed { index, item });
    }

    /// Remove every item and announce it.
    pub fn clear(&mut self) {
        self.items.clear();
        self.announce(&ListEvent::Cleared);
    }

    /// Observe changes made from now on.
    pub fn subscribe(&self) -> ListSubscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_subscribers().push(tx);
        ListSubscription { rx }
    }

    /// Current items in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn announce(&self, event: &ListEvent<T>) {
        let mut subscribers = self.lock_subscribers();
        // A failed send means the subscription was dropped.
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        tracing::trace!(list = self.name, subscribers = subscribers.len(), "list changed");
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<ListEvent<T>>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving side of [`ObservableList::subscribe`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ListSubscription<T> {
    rx: mpsc::UnboundedReceiver<ListEvent<T>>,
}

impl<T> ListSubscription<T> {
    /// Wait for the next change. Returns `None` once the list is dropped.
    pub async fn recv(&mut self) -> Option<ListEvent<T>> {
        self.rx.recv().await
    }

    /// Take the next change if one is already queued.
    pub fn try_recv(&mut self) -> Option<ListEvent<T>> {
        self.rx.try_recv().ok()
    }
}
