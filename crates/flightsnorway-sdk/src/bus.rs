//! Typed publish/subscribe between the parts of the application.
//!
//! A [`MessageBus`] carries one [`Topic`] per message type. Subscribing
//! returns a [`Subscription`] handle; dropping the handle unsubscribes.
//! There is no global messenger: whoever needs the bus is handed a clone.

use flightsnorway_models::Airport;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Default number of messages buffered per subscriber before it lags.
const DEFAULT_CAPACITY: usize = 64;

/// An airport was picked somewhere in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportSelected(pub Airport);

/// Someone wants the airport nearest to the device selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindNearestAirport;

// ---------------------------------------------------------------------------
// Topic / Subscription
// ---------------------------------------------------------------------------

/// Publishing side of a single message type.
#[derive(Debug)]
pub struct Topic<M> {
    name: &'static str,
    tx: broadcast::Sender<M>,
}

impl<M> Clone for Topic<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<M: Clone + Send + 'static> Topic<M> {
    /// Create a topic buffering up to `capacity` messages per subscriber.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { name, tx }
    }

    /// Deliver `message` to every current subscriber.
    ///
    /// Returns how many subscribers it reached; zero is not an error.
    pub fn publish(&self, message: M) -> usize {
        match self.tx.send(message) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!(topic = self.name, "published with no subscribers");
                0
            }
        }
    }

    /// Register a new subscriber. It sees messages published from now on.
    pub fn subscribe(&self) -> Subscription<M> {
        Subscription {
            name: self.name,
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Topic name used in log output.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Receiving side of a [`Topic`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<M> {
    name: &'static str,
    rx: broadcast::Receiver<M>,
}

impl<M: Clone> Subscription<M> {
    /// Wait for the next message.
    ///
    /// Messages lost because this subscriber fell behind are skipped with a
    /// warning. Returns `None` once every publisher of the topic is gone.
    pub async fn recv(&mut self) -> Option<M> {
        loop {
            match self.rx.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(topic = self.name, missed, "subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(topic = self.name, "topic closed");
                    return None;
                }
            }
        }
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<M> {
        loop {
            match self.rx.try_recv() {
                Ok(message) => return Some(message),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!(topic = self.name, missed, "subscriber lagged, messages dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MessageBus
// ---------------------------------------------------------------------------

/// The application's message bus. Cheap to clone; clones share topics.
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// Carries [`AirportSelected`].
    pub airport_selected: Topic<AirportSelected>,
    /// Carries [`FindNearestAirport`].
    pub find_nearest_airport: Topic<FindNearestAirport>,
}

impl MessageBus {
    /// Create a bus with the default per-subscriber buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` messages per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            airport_selected: Topic::new("airport-selected", capacity),
            find_nearest_airport: Topic::new("find-nearest-airport", capacity),
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
