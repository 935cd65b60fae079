//! Resolution of "the airport nearest to me".
//!
//! The selection workflow never resolves the nearest airport itself: it
//! publishes [`FindNearestAirport`] and waits for an [`AirportSelected`].
//! [`NearestAirportResolver`] is the component that answers.

use flightsnorway_models::{Airport, Location};
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::bus::{AirportSelected, FindNearestAirport, MessageBus, Subscription, Topic};
use crate::catalog::AirportCatalog;
use crate::error::SdkError;

/// Source of the device's current position.
pub trait LocationProvider: Send + Sync + 'static {
    /// Current position of the device.
    fn current_location(&self) -> BoxFuture<'static, Result<Location, SdkError>>;
}

/// A [`LocationProvider`] that always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Location);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> BoxFuture<'static, Result<Location, SdkError>> {
        futures::future::ready(Ok(self.0)).boxed()
    }
}

/// Answers [`FindNearestAirport`] requests with an [`AirportSelected`].
pub struct NearestAirportResolver<L> {
    catalog: AirportCatalog,
    locations: L,
    requests: Subscription<FindNearestAirport>,
    selections: Topic<AirportSelected>,
}

impl<L: LocationProvider> NearestAirportResolver<L> {
    /// Subscribe to `bus` right away so no request published after this
    /// call is missed.
    pub fn new(catalog: AirportCatalog, locations: L, bus: &MessageBus) -> Self {
        Self {
            catalog,
            locations,
            requests: bus.find_nearest_airport.subscribe(),
            selections: bus.airport_selected.clone(),
        }
    }

    /// The catalog airport closest to the device, `None` if the catalog is empty.
    pub async fn resolve(&self) -> Result<Option<Airport>, SdkError> {
        let location = self.locations.current_location().await?;
        let nearest = self.catalog.nearest(&location).cloned();
        if let Some(airport) = &nearest {
            tracing::debug!(
                %location,
                airport = %airport.code(),
                distance_km = airport.location().distance_km(&location),
                "resolved nearest airport"
            );
        }
        Ok(nearest)
    }

    /// Answer requests until every publisher of [`FindNearestAirport`] is gone.
    ///
    /// Failures are logged and the request is dropped.
    pub async fn run(mut self) {
        while self.requests.recv().await.is_some() {
            self.handle_request().await;
        }
        tracing::debug!("nearest-airport resolver stopped");
    }

    /// Resolve once and publish the result. Returns the published airport.
    pub async fn handle_request(&self) -> Option<Airport> {
        match self.resolve().await {
            Ok(Some(airport)) => {
                tracing::info!(airport = %airport.code(), "selecting nearest airport");
                self.selections.publish(AirportSelected(airport.clone()));
                Some(airport)
            }
            Ok(None) => {
                tracing::warn!("cannot resolve nearest airport: catalog is empty");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot resolve nearest airport");
                None
            }
        }
    }
}
