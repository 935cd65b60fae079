//! Flight fetching.
//!
//! [`FlightsGateway`] is the only network-facing dependency of the
//! selection workflow. [`AvinorFlightsGateway`] implements it over HTTP
//! against the Avinor flight feed.

use std::sync::Arc;

use flightsnorway_models::{Airport, Flight};
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::feed::FlightFeedParser;

/// Produces the current flights for an airport.
///
/// The returned future owns everything it needs so the caller can spawn it
/// and carry on.
pub trait FlightsGateway: Send + Sync + 'static {
    /// Fetch arrivals and departures for `airport`, in feed order.
    fn flights_from(&self, airport: &Airport) -> BoxFuture<'static, Result<Vec<Flight>, SdkError>>;
}

impl<G: FlightsGateway + ?Sized> FlightsGateway for Arc<G> {
    fn flights_from(&self, airport: &Airport) -> BoxFuture<'static, Result<Vec<Flight>, SdkError>> {
        (**self).flights_from(airport)
    }
}

/// [`FlightsGateway`] backed by the Avinor XML feed.
#[derive(Debug, Clone)]
pub struct AvinorFlightsGateway {
    http: reqwest::Client,
    feed_url: String,
    hours_back: u32,
    hours_ahead: u32,
}

impl AvinorFlightsGateway {
    /// Create a gateway for the feed at `feed_url`, requesting flights
    /// scheduled from `hours_back` hours ago to `hours_ahead` hours ahead.
    pub fn new(feed_url: &str, hours_back: u32, hours_ahead: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            feed_url: feed_url.to_string(),
            hours_back,
            hours_ahead,
        }
    }

    /// Create a gateway from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.feed_url, config.hours_back, config.hours_ahead)
    }

    /// The request URL for `airport`.
    pub fn request_url(&self, airport: &Airport) -> String {
        format!(
            "{}?airport={}&TimeFrom={}&TimeTo={}",
            self.feed_url,
            airport.code(),
            self.hours_back,
            self.hours_ahead
        )
    }
}

impl FlightsGateway for AvinorFlightsGateway {
    fn flights_from(&self, airport: &Airport) -> BoxFuture<'static, Result<Vec<Flight>, SdkError>> {
        let http = self.http.clone();
        let url = self.request_url(airport);
        let code = airport.code().clone();

        async move {
            tracing::debug!(airport = %code, %url, "requesting flights");
            let body = http
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            let flights = FlightFeedParser::parse(body.as_ref())?;
            tracing::info!(airport = %code, count = flights.len(), "received flights");
            Ok(flights)
        }
        .boxed()
    }
}
