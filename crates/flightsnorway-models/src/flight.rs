//! Flight records as delivered by the flights feed.
//!
//! Only [`Flight::direction`] matters to the selection workflow; every other
//! field is carried through unchanged for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::airport::AirportCode;
use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Whether a flight arrives at or departs from the selected airport.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Inbound to the selected airport.
    Arrival,
    /// Outbound from the selected airport.
    Departure,
}

impl Direction {
    /// Parse the single-letter feed code (`A` or `D`).
    pub fn from_code(code: &str) -> Result<Self, ModelError> {
        match code.trim() {
            "A" | "a" => Ok(Direction::Arrival),
            "D" | "d" => Ok(Direction::Departure),
            other => Err(ModelError::InvalidDirection {
                value: other.to_string(),
            }),
        }
    }

    /// The single-letter feed code.
    pub fn code(self) -> &'static str {
        match self {
            Direction::Arrival => "A",
            Direction::Departure => "D",
        }
    }
}

// ---------------------------------------------------------------------------
// FlightStatus
// ---------------------------------------------------------------------------

/// Status code reported by the feed for a flight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FlightStatusCode {
    /// New information is available.
    NewInfo,
    /// The flight has a new estimated time.
    NewTime,
    /// The flight has departed.
    Departed,
    /// The flight has arrived.
    Arrived,
    /// The flight is cancelled.
    Cancelled,
    /// A code this client does not know about, kept verbatim.
    Other(String),
}

impl FlightStatusCode {
    /// Map a feed status code. Unknown codes become [`FlightStatusCode::Other`].
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "N" => FlightStatusCode::NewInfo,
            "E" => FlightStatusCode::NewTime,
            "D" => FlightStatusCode::Departed,
            "A" => FlightStatusCode::Arrived,
            "C" => FlightStatusCode::Cancelled,
            other => FlightStatusCode::Other(other.to_string()),
        }
    }

    /// Short English label used by the terminal front end.
    pub fn label(&self) -> &str {
        match self {
            FlightStatusCode::NewInfo => "new info",
            FlightStatusCode::NewTime => "new time",
            FlightStatusCode::Departed => "departed",
            FlightStatusCode::Arrived => "arrived",
            FlightStatusCode::Cancelled => "cancelled",
            FlightStatusCode::Other(code) => code,
        }
    }
}

/// Status of a flight together with the time it applies to, if any.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlightStatus {
    /// What happened.
    pub code: FlightStatusCode,
    /// When it happened or is expected to happen.
    pub time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Flight
// ---------------------------------------------------------------------------

/// A single arrival or departure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flight {
    /// Feed-wide unique identifier of this flight movement.
    pub unique_id: String,
    /// Flight number, e.g. `SK4035`.
    pub flight_id: String,
    /// Airline designator, e.g. `SK`.
    pub airline: String,
    /// Arrival or departure relative to the selected airport.
    pub direction: Direction,
    /// The other end of the flight (origin for arrivals, destination for departures).
    pub airport: AirportCode,
    /// Scheduled time.
    pub schedule_time: DateTime<Utc>,
    /// `true` for domestic flights.
    pub domestic: bool,
    /// Check-in counters, departures only.
    pub check_in: Option<String>,
    /// Gate, departures only.
    pub gate: Option<String>,
    /// Baggage belt, arrivals only.
    pub belt: Option<String>,
    /// Latest status update, if any.
    pub status: Option<FlightStatus>,
}

impl Flight {
    /// Returns `true` if this flight arrives at the selected airport.
    pub fn is_arrival(&self) -> bool {
        self.direction == Direction::Arrival
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
