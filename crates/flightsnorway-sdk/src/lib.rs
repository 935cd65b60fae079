//! # FlightsNorway SDK
//!
//! Everything needed to show arrivals and departures for a Norwegian
//! airport, minus the user interface.
//!
//! The SDK provides:
//!
//! * [`AirportCatalog`] / [`AirportCatalogParser`]: the airport list,
//!   parsed from its XML document.
//! * [`FlightsController`]: the selection workflow: restores the
//!   persisted selection, reacts to [`AirportSelected`] messages, fetches
//!   flights and splits them into arrivals and departures.
//! * Collaborator traits with concrete implementations:
//!   [`FlightsGateway`] ([`AvinorFlightsGateway`]),
//!   [`SelectionStore`] ([`JsonFileStore`], [`MemoryStore`]),
//!   [`NotificationChannel`] ([`NatsNotificationChannel`]),
//!   [`LocationProvider`] ([`FixedLocation`]).
//! * [`MessageBus`]: typed publish/subscribe between components.
//! * [`NearestAirportResolver`]: answers [`FindNearestAirport`].
//! * [`ClientConfig`]: settings from the environment.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use flightsnorway_sdk::{
//!     AvinorFlightsGateway, ClientConfig, FlightsController, JsonFileStore, MessageBus,
//!     NatsNotificationChannel, SdkError,
//! };
//!
//! # async fn run() -> Result<(), SdkError> {
//! let config = ClientConfig::from_env();
//! let store_dir = config
//!     .resolved_store_dir()
//!     .ok_or_else(|| SdkError::Config("no config directory".into()))?;
//! let bus = MessageBus::new();
//!
//! let mut controller = FlightsController::new(
//!     AvinorFlightsGateway::from_config(&config),
//!     JsonFileStore::new(store_dir),
//!     NatsNotificationChannel::new(&config.nats_url, &config.device_id),
//!     &bus,
//! );
//! controller.initialize();
//! controller.run().await;
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod nearest;
pub mod notification;
pub mod observable;
pub mod store;
pub mod subjects;

pub use bus::{AirportSelected, FindNearestAirport, MessageBus, Subscription, Topic};
pub use catalog::{AirportCatalog, AirportCatalogParser};
pub use config::ClientConfig;
pub use controller::FlightsController;
pub use error::{CatalogError, FeedError, SdkError, StoreError};
pub use feed::FlightFeedParser;
pub use gateway::{AvinorFlightsGateway, FlightsGateway};
pub use nearest::{FixedLocation, LocationProvider, NearestAirportResolver};
pub use notification::{DisabledNotificationChannel, NatsNotificationChannel, NotificationChannel};
pub use observable::{ListEvent, ListSubscription, ObservableList};
pub use store::{JsonFileStore, MemoryStore, SelectionStore, SELECTED_AIRPORT_KEY};
pub use subjects::PushSubjects;
