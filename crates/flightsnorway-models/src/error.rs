//! Error types for the `flightsnorway-models` crate.
//!
//! All fallible constructors and `FromStr` implementations in this crate
//! return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// An airport code was empty or contained whitespace.
    #[error("invalid airport code \"{value}\": {reason}")]
    InvalidAirportCode {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A direction code was neither `A` nor `D`.
    #[error("invalid flight direction \"{value}\": expected \"A\" or \"D\"")]
    InvalidDirection {
        /// The value that failed validation.
        value: String,
    },
}
