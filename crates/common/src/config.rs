//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use std::env;
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// Grace period between a successful submission and leaving the workflow
pub const DEFAULT_NAVIGATION_DELAY_MS: u64 = 1500;

/// Route the workflow returns to when it exits
pub const DEFAULT_RETURN_ROUTE: &str = "/practices";

/// Time pre-filled in the scheduling form
pub const DEFAULT_PUBLISH_TIME: &str = "12:00";

/// Zone scheduled dates and times are interpreted in
pub const DEFAULT_TIMEZONE: &str = "Europe/Kyiv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Language of notifications and rendered dates
    pub locale: Locale,

    /// Zone used to resolve a scheduled date/time into an instant
    pub timezone: Tz,

    /// Delay before navigating away after a successful submission
    pub navigation_delay: Duration,

    /// Route signalled when the workflow exits
    pub return_route: String,

    /// Time offered when scheduling is first selected
    pub default_publish_time: NaiveTime,

    /// Log filter directives used when the binary installs its subscriber
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            timezone: chrono_tz::Europe::Kyiv,
            navigation_delay: Duration::from_millis(DEFAULT_NAVIGATION_DELAY_MS),
            return_route: DEFAULT_RETURN_ROUTE.to_string(),
            default_publish_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            rust_log: "practica=debug".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[mutants::skip] // Thin wrapper over from_lookup, which carries the tests
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Malformed optional values fall back to their defaults with a warning.
    /// An unknown time zone is rejected: resolving schedules in the wrong zone
    /// would silently shift every publication instant.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let locale = match lookup("PRACTICA_LOCALE") {
            Some(raw) => raw.parse().unwrap_or_else(|e: Error| {
                tracing::warn!(error = %e, "Falling back to default locale");
                defaults.locale
            }),
            None => defaults.locale,
        };

        let timezone = match lookup("PRACTICA_TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().map_err(|_| {
                Error::Configuration(format!("PRACTICA_TIMEZONE is not a known zone: {}", raw))
            })?,
            None => defaults.timezone,
        };

        let navigation_delay = lookup("PRACTICA_NAVIGATION_DELAY_MS")
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid PRACTICA_NAVIGATION_DELAY_MS, using default");
                    None
                }
            })
            .unwrap_or(defaults.navigation_delay);

        let return_route = lookup("PRACTICA_RETURN_ROUTE")
            .filter(|route| route.starts_with('/'))
            .unwrap_or(defaults.return_route);

        let default_publish_time = lookup("PRACTICA_DEFAULT_PUBLISH_TIME")
            .and_then(|raw| match NaiveTime::parse_from_str(&raw, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid PRACTICA_DEFAULT_PUBLISH_TIME, using default");
                    None
                }
            })
            .unwrap_or(defaults.default_publish_time);

        let rust_log = lookup("RUST_LOG").unwrap_or(defaults.rust_log);

        Ok(Self {
            locale,
            timezone,
            navigation_delay,
            return_route,
            default_publish_time,
            rust_log,
        })
    }
}
