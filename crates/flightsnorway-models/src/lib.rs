#![deny(missing_docs)]

//! # FlightsNorway Models
//!
//! Core data types shared by the FlightsNorway SDK and front ends.
//!
//! ## Type overview
//!
//! ```text
//! AirportSelection
//! ├── Explicit(Airport)
//! │   ├── AirportCode
//! │   └── Location
//! └── Nearest
//!
//! Flight
//! ├── Direction (Arrival | Departure)
//! └── FlightStatus
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`airport`] | Airport identity, location, and the persisted selection |
//! | [`flight`] | Flight records, direction, and status codes |
//! | [`error`] | [`ModelError`] for fallible conversions |

pub mod airport;
pub mod error;
pub mod flight;

// Re-export all public types at crate root for convenience.
pub use airport::*;
pub use error::*;
pub use flight::*;
