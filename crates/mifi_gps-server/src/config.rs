// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Process-wide settings, read once at startup.
//!
//! Only the database connection string is required. Everything else has a
//! default matching the stock MiFi hotspot setup.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `MIFI_GPS_DBCONNSTR` | yes | |
//! | `MIFI_GPS_MAPSAPIKEY` | no | none |
//! | `MIFI_GPS_DEVICE_ADDR` | no | `192.168.1.1:11010` |
//! | `MIFI_GPS_LISTEN_ADDR` | no | `0.0.0.0:8080` |

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::queue::DEFAULT_QUEUE_CAPACITY;

/// Database connection string (required).
pub const ENV_DB_CONN: &str = "MIFI_GPS_DBCONNSTR";
/// Maps API key for the embedded status-page map.
pub const ENV_MAPS_API_KEY: &str = "MIFI_GPS_MAPSAPIKEY";
/// Device telemetry endpoint, `host:port`.
pub const ENV_DEVICE_ADDR: &str = "MIFI_GPS_DEVICE_ADDR";
/// Status page bind address, `host:port`.
pub const ENV_LISTEN_ADDR: &str = "MIFI_GPS_LISTEN_ADDR";

/// Default device telemetry endpoint on the hotspot's LAN.
pub const DEFAULT_DEVICE_ADDR: &str = "192.168.1.1:11010";
/// Default status page bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Optional maps API key for the status page.
    pub maps_api_key: Option<String>,
    /// Device telemetry endpoint.
    pub device_addr: String,
    /// Status page bind address.
    pub listen_addr: String,
    /// Wait between a stream failure and the next connection attempt.
    pub reconnect_cooldown: Duration,
    /// Delay before the first sampling cycle.
    pub sample_delay: Duration,
    /// Interval between sampling cycles.
    pub sample_period: Duration,
    /// Interval between flush cycles.
    pub flush_period: Duration,
    /// Maximum number of records held while storage is unreachable.
    pub queue_capacity: usize,
}

impl Config {
    /// Configuration with default settings and the given connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            maps_api_key: None,
            device_addr: DEFAULT_DEVICE_ADDR.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            reconnect_cooldown: Duration::from_secs(60),
            sample_delay: Duration::from_secs(10),
            sample_period: Duration::from_secs(15 * 60),
            flush_period: Duration::from_secs(5 * 60),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get(ENV_DB_CONN).ok_or(ConfigError::Missing { var: ENV_DB_CONN })?;
        let mut config = Config::new(database_url);
        config.maps_api_key = get(ENV_MAPS_API_KEY);

        if let Some(addr) = get(ENV_DEVICE_ADDR) {
            config.device_addr = validate_addr(ENV_DEVICE_ADDR, addr)?;
        }
        if let Some(addr) = get(ENV_LISTEN_ADDR) {
            config.listen_addr = validate_addr(ENV_LISTEN_ADDR, addr)?;
        }
        Ok(config)
    }
}

fn validate_addr(var: &'static str, addr: String) -> Result<String, ConfigError> {
    let port = addr.rsplit_once(':').map(|(_, port)| port.parse::<u16>());
    match port {
        Some(Ok(_)) => Ok(addr),
        _ => Err(ConfigError::Invalid {
            var,
            detail: format!("expected host:port, got {addr:?}"),
        }),
    }
}

// The connection string usually embeds a password, keep it out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("maps_api_key", &self.maps_api_key.as_ref().map(|_| "<redacted>"))
            .field("device_addr", &self.device_addr)
            .field("listen_addr", &self.listen_addr)
            .field("reconnect_cooldown", &self.reconnect_cooldown)
            .field("sample_delay", &self.sample_delay)
            .field("sample_period", &self.sample_period)
            .field("flush_period", &self.flush_period)
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_connection_string_is_fatal() {
        let err = Config::from_lookup(lookup(&[(ENV_MAPS_API_KEY, "key")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: ENV_DB_CONN });

        let err = Config::from_lookup(lookup(&[(ENV_DB_CONN, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: ENV_DB_CONN });
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(ENV_DB_CONN, "postgres://localhost/gps")]))
            .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/gps");
        assert_eq!(config.maps_api_key, None);
        assert_eq!(config.device_addr, DEFAULT_DEVICE_ADDR);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.reconnect_cooldown, Duration::from_secs(60));
        assert_eq!(config.sample_period, Duration::from_secs(900));
        assert_eq!(config.flush_period, Duration::from_secs(300));
        assert_eq!(config.queue_capacity, 100);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DB_CONN, "postgres://localhost/gps"),
            (ENV_MAPS_API_KEY, "abc123"),
            (ENV_DEVICE_ADDR, "10.0.0.1:11010"),
            (ENV_LISTEN_ADDR, "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.maps_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.device_addr, "10.0.0.1:11010");
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_address() {
        let err = Config::from_lookup(lookup(&[
            (ENV_DB_CONN, "postgres://localhost/gps"),
            (ENV_DEVICE_ADDR, "192.168.1.1"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: ENV_DEVICE_ADDR,
                ..
            }
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::new("postgres://user:hunter2@db/gps");
        config.maps_api_key = Some("secret-key".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret-key"));
    }
}
