//! Client configuration.
//!
//! Built from environment variables at startup; the binary lets command-line
//! flags override individual fields.

use std::path::PathBuf;

/// Default Avinor flight feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://flydata.avinor.no/XmlFeed.asp";
/// Default NATS server for the push channel.
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

const APP_DIR: &str = "flightsnorway";

/// Settings shared by the gateway, store and notification channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Flights feed endpoint.
    pub feed_url: String,
    /// Include flights scheduled up to this many hours ago.
    pub hours_back: u32,
    /// Include flights scheduled up to this many hours ahead.
    pub hours_ahead: u32,
    /// NATS server used for push notifications.
    pub nats_url: String,
    /// Identifies this device's push subject.
    pub device_id: String,
    /// Directory for persisted state; `None` means the platform config dir.
    pub store_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            hours_back: 1,
            hours_ahead: 7,
            nats_url: DEFAULT_NATS_URL.to_string(),
            device_id: "local".to_string(),
            store_dir: None,
        }
    }
}

impl ClientConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable              | Default                                 |
    /// |-----------------------|-----------------------------------------|
    /// | `FLIGHTS_FEED_URL`    | `https://flydata.avinor.no/XmlFeed.asp` |
    /// | `FLIGHTS_HOURS_BACK`  | `1`                                     |
    /// | `FLIGHTS_HOURS_AHEAD` | `7`                                     |
    /// | `NATS_URL`            | `nats://localhost:4222`                 |
    /// | `FLIGHTS_DEVICE_ID`   | `local`                                 |
    /// | `FLIGHTS_STORE_DIR`   | platform config dir + `flightsnorway`   |
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            feed_url: lookup("FLIGHTS_FEED_URL").unwrap_or(defaults.feed_url),
            hours_back: lookup("FLIGHTS_HOURS_BACK")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hours_back),
            hours_ahead: lookup("FLIGHTS_HOURS_AHEAD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hours_ahead),
            nats_url: lookup("NATS_URL").unwrap_or(defaults.nats_url),
            device_id: lookup("FLIGHTS_DEVICE_ID").unwrap_or(defaults.device_id),
            store_dir: lookup("FLIGHTS_STORE_DIR").map(PathBuf::from),
        }
    }

    /// Directory where the selection store keeps its files.
    pub fn resolved_store_dir(&self) -> Option<PathBuf> {
        self.store_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR)))
    }
}
