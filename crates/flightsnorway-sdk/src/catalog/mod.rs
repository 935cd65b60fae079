//! The airport catalog.
//!
//! [`AirportCatalogParser`] turns the catalog document into airports;
//! [`AirportCatalog`] keeps them in document order with lookup by code and
//! nearest-airport search.
//!
//! # Example
//!
//! ```
//! use flightsnorway_models::Location;
//! use flightsnorway_sdk::AirportCatalog;
//!
//! let doc = r#"<Airports>
//!   <Airport Code="OSL" Name="Oslo" Lat="60.1939" Lon="11.1004"/>
//!   <Airport Code="TRD" Name="Trondheim" Lat="63.4578" Lon="10.9240"/>
//! </Airports>"#;
//!
//! let catalog = AirportCatalog::from_reader(doc.as_bytes())?;
//! let nearest = catalog.nearest(&Location::new(63.43, 10.39)).unwrap();
//! assert_eq!(nearest.code().as_str(), "TRD");
//! # Ok::<(), flightsnorway_sdk::CatalogError>(())
//! ```

mod parser;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flightsnorway_models::{Airport, Location};

use crate::error::CatalogError;

pub use parser::AirportCatalogParser;

/// Airports loaded from a catalog document.
#[derive(Debug, Clone, Default)]
pub struct AirportCatalog {
    airports: Vec<Airport>,
    by_code: HashMap<String, usize>,
}

impl AirportCatalog {
    /// Build a catalog from already-parsed airports.
    ///
    /// When two airports share a code, lookups return the first one.
    pub fn new(airports: Vec<Airport>) -> Self {
        let mut by_code = HashMap::with_capacity(airports.len());
        for (idx, airport) in airports.iter().enumerate() {
            by_code
                .entry(airport.code().as_str().to_uppercase())
                .or_insert(idx);
        }
        Self { airports, by_code }
    }

    /// Parse a catalog document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog = Self::new(AirportCatalogParser::parse(reader)?);
        tracing::info!(count = catalog.len(), "loaded airport catalog");
        Ok(catalog)
    }

    /// Parse a catalog document from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening airport catalog");
        Self::from_reader(File::open(path)?)
    }

    /// Look up an airport by code, ignoring case.
    ///
    /// Parsed catalogs store codes upper-cased, so the airport returned here
    /// compares equal to one persisted from an earlier lookup.
    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&idx| &self.airports[idx])
    }

    /// The airport closest to `location`, or `None` for an empty catalog.
    pub fn nearest(&self, location: &Location) -> Option<&Airport> {
        self.airports.iter().min_by(|a, b| {
            let da = a.location().distance_km(location);
            let db = b.location().distance_km(location);
            da.total_cmp(&db)
        })
    }

    /// Number of airports in the catalog.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Airports in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }
}
