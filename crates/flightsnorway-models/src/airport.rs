//! Airport identity, location and the user's persisted selection.
//!
//! An [`Airport`] is identified by its [`AirportCode`] alone: two airports
//! with the same code compare equal even if their names or coordinates
//! differ. The user's choice is stored as an [`AirportSelection`], which
//! keeps "resolve the nearest airport" apart from every concrete airport.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Mean earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// AirportCode
// ---------------------------------------------------------------------------

/// Short unique code of an airport (e.g. `"OSL"`, `"BGO"`).
///
/// [`AirportCode::new`] stores the value verbatim. Parsing through
/// [`FromStr`] validates and upper-cases user input.
///
/// # Examples
///
/// ```
/// use flightsnorway_models::AirportCode;
///
/// let code: AirportCode = "osl".parse().unwrap();
/// assert_eq!(code.as_str(), "OSL");
/// assert!(" ".parse::<AirportCode>().is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportCode(String);

impl AirportCode {
    /// Create a code from an already-trusted string.
    pub fn new(code: &str) -> Self {
        Self(code.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for AirportCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for AirportCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidAirportCode {
                value: s.to_string(),
                reason: "must not be empty".into(),
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidAirportCode {
                value: s.to_string(),
                reason: "must not contain whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_uppercase()))
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A point on the globe in decimal degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Location {
    /// Create a location from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    pub fn distance_km(&self, other: &Location) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Airport
// ---------------------------------------------------------------------------

/// An airport from the catalog.
///
/// Immutable once constructed. Equality and hashing use the code only.
///
/// # Examples
///
/// ```
/// use flightsnorway_models::{Airport, Location};
///
/// let a = Airport::new("OSL", "Oslo Lufthavn", Location::new(60.19, 11.10));
/// let b = Airport::new("OSL", "Gardermoen", Location::new(0.0, 0.0));
/// assert_eq!(a, b);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Airport {
    code: AirportCode,
    name: String,
    location: Location,
}

impl Airport {
    /// Create a new airport.
    pub fn new(code: impl Into<AirportCode>, name: &str, location: Location) -> Self {
        Self {
            code: code.into(),
            name: name.to_string(),
            location,
        }
    }

    /// The airport's unique code.
    pub fn code(&self) -> &AirportCode {
        &self.code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference position of the airport.
    pub fn location(&self) -> Location {
        self.location
    }
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Airport {}

impl Hash for Airport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

// ---------------------------------------------------------------------------
// AirportSelection
// ---------------------------------------------------------------------------

/// The user's airport choice as persisted between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum AirportSelection {
    /// A concrete airport picked by the user.
    Explicit(Airport),
    /// Resolve to whichever catalog airport is closest to the device.
    Nearest,
}

impl AirportSelection {
    /// The concrete airport, if this is an explicit selection.
    pub fn airport(&self) -> Option<&Airport> {
        match self {
            AirportSelection::Explicit(airport) => Some(airport),
            AirportSelection::Nearest => None,
        }
    }

    /// Returns `true` for [`AirportSelection::Nearest`].
    pub fn is_nearest(&self) -> bool {
        matches!(self, AirportSelection::Nearest)
    }
}

impl From<Airport> for AirportSelection {
    fn from(airport: Airport) -> Self {
        AirportSelection::Explicit(airport)
    }
}

impl fmt::Display for AirportSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirportSelection::Explicit(airport) => airport.fmt(f),
            AirportSelection::Nearest => f.write_str("nearest airport"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
