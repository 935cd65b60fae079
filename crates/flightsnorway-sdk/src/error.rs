//! SDK error types.
//!
//! [`SdkError`] is returned by every fallible collaborator in the SDK
//! (gateway, notification channel, location provider). The narrower
//! [`CatalogError`], [`FeedError`] and [`StoreError`] are returned by the
//! parsers and the selection store and convert into [`SdkError`] with `?`.

/// Failure to turn an airport catalog document into airports.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not well-formed markup.
    #[error("malformed airport catalog: {0}")]
    Parse(String),

    /// An `Airport` element is missing an attribute or carries a bad value.
    #[error("airport #{element_index} in catalog: {reason}")]
    Format {
        /// Zero-based position of the offending element in the document.
        element_index: usize,
        /// Human-readable explanation.
        reason: String,
    },

    /// Reading the catalog failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for CatalogError {
    fn from(e: quick_xml::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

/// Failure to turn a flights feed document into flights.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The document is not well-formed markup.
    #[error("malformed flights feed: {0}")]
    Parse(String),

    /// A flight element lacks a mandatory child element.
    #[error("flight #{index} is missing <{field}>")]
    MissingField {
        /// Zero-based position of the flight in the feed.
        index: usize,
        /// Name of the missing element.
        field: &'static str,
    },

    /// A flight element carries a value that cannot be interpreted.
    #[error("flight #{index} has invalid <{field}> \"{value}\"")]
    InvalidValue {
        /// Zero-based position of the flight in the feed.
        index: usize,
        /// Name of the element.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::Parse(e.to_string())
    }
}

/// Failure to read or write a persisted value.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored under the key.
    #[error("no stored value for key \"{0}\"")]
    NotFound(String),

    /// The stored value could not be deserialized.
    #[error("stored value for key \"{key}\" is corrupt: {source}")]
    Corrupt {
        /// The key that was read.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The value to store could not be serialized.
    #[error("value for key \"{key}\" cannot be serialized: {source}")]
    Serialize {
        /// The key that was written.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for all SDK collaborators.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad URL, missing directory).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failure while fetching the flights feed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NATS transport error.
    #[error("NATS error: {0}")]
    Nats(String),

    /// The airport catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The flights feed could not be parsed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The selection store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The device position is unavailable.
    #[error("location unavailable: {0}")]
    Location(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Push notifications were turned off on purpose.
    #[error("push notifications are disabled")]
    PushDisabled,
}

impl From<async_nats::ConnectError> for SdkError {
    fn from(e: async_nats::ConnectError) -> Self {
        SdkError::Nats(e.to_string())
    }
}

impl From<async_nats::SubscribeError> for SdkError {
    fn from(e: async_nats::SubscribeError) -> Self {
        SdkError::Nats(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_format_display() {
        let err = CatalogError::Format {
            element_index: 3,
            reason: "missing attribute \"Lat\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "airport #3 in catalog: missing attribute \"Lat\""
        );
    }

    #[test]
    fn feed_missing_field_display() {
        let err = FeedError::MissingField {
            index: 0,
            field: "arr_dep",
        };
        assert_eq!(err.to_string(), "flight #0 is missing <arr_dep>");
    }

    #[test]
    fn store_errors_convert_transparently() {
        let err: SdkError = StoreError::NotFound("selected-airport".into()).into();
        assert_eq!(
            err.to_string(),
            "no stored value for key \"selected-airport\""
        );
    }
}
