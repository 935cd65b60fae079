//! The airport selection workflow.
//!
//! [`FlightsController`] owns the arrivals and departures lists for the
//! selected airport. A new selection clears both lists and starts one
//! background fetch; when the fetch completes its flights are pushed onto
//! the lists one by one, split by direction.
//!
//! All state changes happen on the task that drives the controller
//! ([`FlightsController::step`] / [`FlightsController::run`]). Fetches run
//! as separate tasks and report back over a channel, tagged with the
//! generation that started them; results from any earlier generation are
//! discarded, so a slow fetch for a previous airport can never fill the
//! lists of the current one.

use flightsnorway_models::{Airport, AirportCode, AirportSelection, Direction, Flight};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::bus::{AirportSelected, FindNearestAirport, MessageBus, Subscription, Topic};
use crate::error::SdkError;
use crate::gateway::FlightsGateway;
use crate::notification::NotificationChannel;
use crate::observable::ObservableList;
use crate::store::{SelectionStore, SELECTED_AIRPORT_KEY};

/// Completion report of one background fetch.
struct FetchOutcome {
    generation: u64,
    airport: AirportCode,
    result: Result<Vec<Flight>, SdkError>,
}

/// Drives airport selection and flight loading.
pub struct FlightsController<G, S, N> {
    gateway: G,
    store: S,
    notifications: N,

    find_nearest: Topic<FindNearestAirport>,
    selections: Subscription<AirportSelected>,

    selected: Option<Airport>,
    generation: u64,
    fetch_task: Option<JoinHandle<()>>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    results_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    arrivals: ObservableList<Flight>,
    departures: ObservableList<Flight>,
}

impl<G, S, N> FlightsController<G, S, N>
where
    G: FlightsGateway,
    S: SelectionStore,
    N: NotificationChannel,
{
    /// Create a controller and subscribe it to [`AirportSelected`] on `bus`.
    ///
    /// Nothing is loaded until [`initialize`](Self::initialize) is called.
    pub fn new(gateway: G, store: S, notifications: N, bus: &MessageBus) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            store,
            notifications,
            find_nearest: bus.find_nearest_airport.clone(),
            selections: bus.airport_selected.subscribe(),
            selected: None,
            generation: 0,
            fetch_task: None,
            results_tx,
            results_rx,
            arrivals: ObservableList::new("arrivals"),
            departures: ObservableList::new("departures"),
        }
    }

    /// Start-up: open the push channel in the background and restore the
    /// persisted selection.
    ///
    /// Returns the persisted selection that was acted upon, if any. A
    /// missing or unreadable selection leaves the controller idle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn initialize(&mut self) -> Option<AirportSelection> {
        let open = self.notifications.open();
        tokio::spawn(async move {
            match open.await {
                Ok(address) => tracing::info!(%address, "push channel opened"),
                Err(SdkError::PushDisabled) => tracing::debug!("push channel disabled"),
                Err(e) => tracing::warn!(error = %e, "push channel unavailable"),
            }
        });

        let selection = self.load_selection()?;
        match &selection {
            AirportSelection::Nearest => {
                tracing::info!("restoring nearest-airport selection");
                self.find_nearest.publish(FindNearestAirport);
            }
            AirportSelection::Explicit(airport) => {
                tracing::info!(airport = %airport.code(), "restoring selected airport");
                self.set_selection(airport.clone());
            }
        }
        Some(selection)
    }

    fn load_selection(&self) -> Option<AirportSelection> {
        if !self.store.exists(SELECTED_AIRPORT_KEY) {
            tracing::debug!("no persisted airport selection");
            return None;
        }
        match self.store.load(SELECTED_AIRPORT_KEY) {
            Ok(selection) => Some(selection),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable airport selection");
                None
            }
        }
    }

    /// Select `airport` and start fetching its flights.
    ///
    /// Returns `false` without doing anything if `airport` is already the
    /// current selection. Otherwise clears both lists, cancels the previous
    /// fetch, starts a new one, and returns `true` without waiting for it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime when `airport` is a new
    /// selection.
    pub fn set_selection(&mut self, airport: Airport) -> bool {
        if self.selected.as_ref() == Some(&airport) {
            tracing::debug!(airport = %airport.code(), "airport already selected");
            return false;
        }

        self.arrivals.clear();
        self.departures.clear();

        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        let code = airport.code().clone();
        tracing::info!(airport = %code, generation, "airport selected, fetching flights");

        let fetch = self.gateway.flights_from(&airport);
        let results = self.results_tx.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let result = fetch.await;
            let _ = results.send(FetchOutcome {
                generation,
                airport: code,
                result,
            });
        }));

        self.selected = Some(airport);
        true
    }

    /// Apply fetched flights if they belong to the current generation.
    ///
    /// Each flight is pushed onto arrivals or departures in delivered order.
    /// Returns `false` if the flights were stale and ignored.
    pub fn on_flights_received(&mut self, generation: u64, flights: Vec<Flight>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding flights from a previous selection"
            );
            return false;
        }

        for flight in flights {
            match flight.direction {
                Direction::Arrival => self.arrivals.push(flight),
                Direction::Departure => self.departures.push(flight),
            }
        }
        tracing::debug!(
            generation,
            arrivals = self.arrivals.len(),
            departures = self.departures.len(),
            "flights applied"
        );
        true
    }

    /// React to an [`AirportSelected`] published elsewhere in the application.
    pub fn on_external_selection_broadcast(&mut self, airport: Airport) -> bool {
        self.set_selection(airport)
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome.result {
            Ok(flights) => {
                self.on_flights_received(outcome.generation, flights);
            }
            Err(e) => {
                tracing::warn!(
                    airport = %outcome.airport,
                    generation = outcome.generation,
                    error = %e,
                    "failed to fetch flights"
                );
            }
        }
        if outcome.generation == self.generation {
            self.fetch_task = None;
        }
    }

    /// Handle the next selection message or completed fetch.
    ///
    /// Returns `false` once no publisher of [`AirportSelected`] remains.
    pub async fn step(&mut self) -> bool {
        tokio::select! {
            message = self.selections.recv() => match message {
                Some(AirportSelected(airport)) => {
                    self.on_external_selection_broadcast(airport);
                    true
                }
                None => false,
            },
            Some(outcome) = self.results_rx.recv() => {
                self.apply_outcome(outcome);
                true
            }
        }
    }

    /// Run [`step`](Self::step) until it reports the bus is gone.
    pub async fn run(&mut self) {
        while self.step().await {}
        tracing::debug!("flights controller stopped");
    }

    /// The current selection, if any.
    pub fn selected(&self) -> Option<&Airport> {
        self.selected.as_ref()
    }

    /// Flights arriving at the selected airport.
    pub fn arrivals(&self) -> &ObservableList<Flight> {
        &self.arrivals
    }

    /// Flights departing from the selected airport.
    pub fn departures(&self) -> &ObservableList<Flight> {
        &self.departures
    }

    /// Generation of the most recent selection; starts at zero.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true while a fetch for the current selection is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.fetch_task.is_some()
    }
}

impl<G, S, N> Drop for FlightsController<G, S, N> {
    fn drop(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
    }
}
