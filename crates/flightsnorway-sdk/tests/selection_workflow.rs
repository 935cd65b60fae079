//! End-to-end selection workflow: persisted "nearest" selection, resolver,
//! controller, and a canned flights feed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use flightsnorway_models::{Airport, AirportCode, AirportSelection, Flight, Location};
use flightsnorway_sdk::{
    AirportCatalog, AirportSelected, DisabledNotificationChannel, FixedLocation,
    FlightFeedParser, FlightsController, FlightsGateway, JsonFileStore, MessageBus,
    NearestAirportResolver, SdkError, SelectionStore, SELECTED_AIRPORT_KEY,
};
use futures::future::BoxFuture;
use futures::FutureExt;

const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Airports>
  <Airport Code="OSL" Name="Oslo+Lufthavn" Lat="60.1939" Lon="11.1004"/>
  <Airport Code="BGO" Name="Bergen+Lufthavn" Lat="60.2934" Lon="5.2181"/>
  <Airport Code="TRD" Name="Trondheim+Lufthavn" Lat="63.4578" Lon="10.9240"/>
</Airports>"#;

const FEED: &str = r#"<airport name="TRD"><flights lastUpdate="2011-03-09T10:40:00Z">
  <flight uniqueID="1"><airline>DY</airline><flight_id>DY741</flight_id><dom_int>D</dom_int>
    <schedule_time>2011-03-09T11:00:00Z</schedule_time><arr_dep>A</arr_dep><airport>OSL</airport></flight>
  <flight uniqueID="2"><airline>SK</airline><flight_id>SK362</flight_id><dom_int>D</dom_int>
    <schedule_time>2011-03-09T11:10:00Z</schedule_time><arr_dep>D</arr_dep><airport>BGO</airport></flight>
  <flight uniqueID="3"><airline>WF</airline><flight_id>WF762</flight_id><dom_int>D</dom_int>
    <schedule_time>2011-03-09T11:20:00Z</schedule_time><arr_dep>A</arr_dep><airport>BOO</airport></flight>
</flights></airport>"#;

/// Serves the same canned feed for every airport and records requests.
#[derive(Clone, Default)]
struct CannedFeed {
    requests: Arc<Mutex<Vec<AirportCode>>>,
}

impl FlightsGateway for CannedFeed {
    fn flights_from(&self, airport: &Airport) -> BoxFuture<'static, Result<Vec<Flight>, SdkError>> {
        self.requests.lock().unwrap().push(airport.code().clone());
        futures::future::ready(FlightFeedParser::parse(FEED.as_bytes()).map_err(SdkError::from))
            .boxed()
    }
}

async fn step<G, S, N>(controller: &mut FlightsController<G, S, N>)
where
    G: FlightsGateway,
    S: SelectionStore,
    N: flightsnorway_sdk::NotificationChannel,
{
    let progressed = tokio::time::timeout(Duration::from_secs(5), controller.step())
        .await
        .expect("controller step timed out");
    assert!(progressed);
}

#[tokio::test]
async fn nearest_selection_is_resolved_and_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store
        .save(SELECTED_AIRPORT_KEY, &AirportSelection::Nearest)
        .unwrap();

    let bus = MessageBus::new();
    let catalog = AirportCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    // Trondheim city centre.
    let resolver =
        NearestAirportResolver::new(catalog, FixedLocation(Location::new(63.43, 10.39)), &bus);
    let resolver_task = tokio::spawn(resolver.run());

    let feed = CannedFeed::default();
    let mut controller =
        FlightsController::new(feed.clone(), store, DisabledNotificationChannel, &bus);

    assert_eq!(controller.initialize(), Some(AirportSelection::Nearest));
    assert!(controller.selected().is_none());

    // The resolver answers with Trondheim, which the controller selects.
    step(&mut controller).await;
    assert_eq!(controller.selected().unwrap().code().as_str(), "TRD");

    // Then the fetch completes.
    step(&mut controller).await;
    let arrivals: Vec<_> = controller.arrivals().iter().map(|f| f.flight_id.as_str()).collect();
    let departures: Vec<_> = controller
        .departures()
        .iter()
        .map(|f| f.flight_id.as_str())
        .collect();
    assert_eq!(arrivals, vec!["DY741", "WF762"]);
    assert_eq!(departures, vec!["SK362"]);
    assert_eq!(*feed.requests.lock().unwrap(), vec![AirportCode::new("TRD")]);

    resolver_task.abort();
}

#[tokio::test]
async fn picker_selection_replaces_restored_airport() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let catalog = AirportCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    let oslo = catalog.get("OSL").unwrap().clone();
    let bergen = catalog.get("BGO").unwrap().clone();
    store
        .save(SELECTED_AIRPORT_KEY, &AirportSelection::from(oslo.clone()))
        .unwrap();

    let bus = MessageBus::new();
    let feed = CannedFeed::default();
    let mut controller =
        FlightsController::new(feed.clone(), store, DisabledNotificationChannel, &bus);

    controller.initialize();
    assert_eq!(controller.selected(), Some(&oslo));

    // A map picker elsewhere selects Bergen before Oslo's flights arrive,
    // and then selects it again.
    bus.airport_selected.publish(AirportSelected(bergen.clone()));
    bus.airport_selected.publish(AirportSelected(bergen.clone()));

    while controller.selected() != Some(&bergen) || controller.is_fetching() {
        step(&mut controller).await;
    }
    // Drain the duplicate message if it is still queued.
    while let Ok(true) =
        tokio::time::timeout(Duration::from_millis(50), controller.step()).await
    {}

    assert_eq!(
        *feed.requests.lock().unwrap(),
        vec![AirportCode::new("OSL"), AirportCode::new("BGO")]
    );
    assert_eq!(controller.arrivals().len(), 2);
    assert_eq!(controller.departures().len(), 1);
}
