//! Server configuration from environment variables.

use std::time::Duration;

/// Runtime settings for the web server and the expiry sweep.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often the expiry sweep runs.
    pub cleanup_interval: Duration,
    /// How long after its end date a tournament is kept before deletion.
    pub retention: chrono::Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_RETENTION_HOURS: i64 = 24;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            retention: chrono::Duration::hours(DEFAULT_RETENTION_HOURS),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `CLEANUP_INTERVAL_SECS` and `RETENTION_HOURS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys use defaults; unparseable ones log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port);
        let cleanup_secs = parse_or(&lookup, "CLEANUP_INTERVAL_SECS", DEFAULT_CLEANUP_INTERVAL_SECS);
        let retention_hours = parse_or(&lookup, "RETENTION_HOURS", DEFAULT_RETENTION_HOURS);
        Self {
            host,
            port,
            cleanup_interval: if cleanup_secs == 0 {
                log::warn!("CLEANUP_INTERVAL_SECS must be positive, using default");
                defaults.cleanup_interval
            } else {
                Duration::from_secs(cleanup_secs)
            },
            retention: if retention_hours < 0 {
                log::warn!("RETENTION_HOURS must not be negative, using default");
                defaults.retention
            } else {
                chrono::Duration::hours(retention_hours)
            },
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Invalid value {:?} for {}, using default", raw, key);
                default
            }
        },
    }
}
