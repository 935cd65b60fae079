mod output;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use flightsnorway_models::{Airport, AirportSelection, Flight, Location};
use flightsnorway_sdk::{
    AirportCatalog, AirportSelected, AvinorFlightsGateway, ClientConfig,
    DisabledNotificationChannel, FixedLocation, FlightsController, FlightsGateway, JsonFileStore,
    ListEvent, ListSubscription, MessageBus, NatsNotificationChannel, NearestAirportResolver,
    NotificationChannel, SelectionStore, SELECTED_AIRPORT_KEY,
};

use crate::output::{airport_line, flight_line};

#[derive(Parser, Debug)]
#[command(name = "flightsnorway")]
#[command(about = "Arrivals and departures for Norwegian airports")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Flights feed endpoint (overrides FLIGHTS_FEED_URL)
    #[arg(long, global = true)]
    feed_url: Option<String>,

    /// NATS server for push notifications (overrides NATS_URL)
    #[arg(long, global = true)]
    nats_url: Option<String>,

    /// Device identifier for the push subject (overrides FLIGHTS_DEVICE_ID)
    #[arg(long, global = true)]
    device_id: Option<String>,

    /// Directory holding the persisted selection (overrides FLIGHTS_STORE_DIR)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the airports in a catalog file
    Airports {
        /// Airport catalog XML
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Persist the airport to load on the next start
    Select {
        /// Airport catalog XML
        #[arg(long)]
        catalog: PathBuf,
        /// Airport code, or `nearest`
        airport: String,
    },
    /// Load flights for the selected airport and follow selection changes
    Watch {
        /// Airport catalog XML
        #[arg(long)]
        catalog: PathBuf,
        /// Device latitude used for the nearest airport
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Device longitude used for the nearest airport
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Select this airport after start-up, as a picker would
        #[arg(long)]
        airport: Option<String>,
        /// Do not open the push notification channel
        #[arg(long)]
        no_push: bool,
    },
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.feed_url {
            config.feed_url.clone_from(url);
        }
        if let Some(url) = &self.nats_url {
            config.nats_url.clone_from(url);
        }
        if let Some(id) = &self.device_id {
            config.device_id.clone_from(id);
        }
        if let Some(dir) = &self.store_dir {
            config.store_dir = Some(dir.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Command::Airports { catalog } => {
            let catalog = load_catalog(&catalog)?;
            for airport in catalog.iter() {
                println!("{}", airport_line(airport));
            }
        }
        Command::Select { catalog, airport } => {
            let catalog = load_catalog(&catalog)?;
            let selection = if airport.eq_ignore_ascii_case("nearest") {
                AirportSelection::Nearest
            } else {
                let found = catalog
                    .get(&airport)
                    .ok_or_else(|| anyhow!("unknown airport {airport}"))?;
                AirportSelection::from(found.clone())
            };
            let store = open_store(&config)?;
            store.save(SELECTED_AIRPORT_KEY, &selection)?;
            println!("selected {selection}");
        }
        Command::Watch {
            catalog,
            lat,
            lon,
            airport,
            no_push,
        } => {
            let catalog = load_catalog(&catalog)?;
            let location = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
                _ => None,
            };
            let picked = match airport {
                Some(code) => Some(
                    catalog
                        .get(&code)
                        .cloned()
                        .ok_or_else(|| anyhow!("unknown airport {code}"))?,
                ),
                None => None,
            };

            let store = open_store(&config)?;
            let gateway = AvinorFlightsGateway::from_config(&config);
            if no_push {
                watch(catalog, location, picked, gateway, store, DisabledNotificationChannel).await;
            } else {
                let channel = NatsNotificationChannel::new(&config.nats_url, &config.device_id);
                watch(catalog, location, picked, gateway, store, channel).await;
            }
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> anyhow::Result<AirportCatalog> {
    let catalog = AirportCatalog::from_path(path)
        .with_context(|| format!("reading airport catalog {}", path.display()))?;
    if catalog.is_empty() {
        bail!("airport catalog {} has no airports", path.display());
    }
    Ok(catalog)
}

fn open_store(config: &ClientConfig) -> anyhow::Result<JsonFileStore> {
    let dir = config
        .resolved_store_dir()
        .ok_or_else(|| anyhow!("no config directory; pass --store-dir"))?;
    Ok(JsonFileStore::new(dir))
}

async fn watch<G, S, N>(
    catalog: AirportCatalog,
    location: Option<Location>,
    picked: Option<Airport>,
    gateway: G,
    store: S,
    notifications: N,
) where
    G: FlightsGateway,
    S: SelectionStore,
    N: NotificationChannel,
{
    let bus = MessageBus::new();

    match location {
        Some(location) => {
            let resolver = NearestAirportResolver::new(catalog, FixedLocation(location), &bus);
            tokio::spawn(resolver.run());
        }
        None => tracing::info!("no device position given, nearest airport is unavailable"),
    }

    let mut controller = FlightsController::new(gateway, store, notifications, &bus);
    tokio::spawn(print_events("arrival", controller.arrivals().subscribe()));
    tokio::spawn(print_events("departure", controller.departures().subscribe()));

    match controller.initialize() {
        Some(selection) => tracing::info!(%selection, "restored selection"),
        None => tracing::info!("no airport selected yet"),
    }
    if let Some(airport) = picked {
        bus.airport_selected.publish(AirportSelected(airport));
    }

    tokio::select! {
        () = controller.run() => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
}

async fn print_events(label: &'static str, mut events: ListSubscription<Flight>) {
    while let Some(event) = events.recv().await {
        match event {
            ListEvent::Cleared => println!("-- {label}s cleared"),
            ListEvent::Pushed { item, .. } => println!("{label:<9} {}", flight_line(&item)),
        }
    }
}
