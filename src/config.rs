//! Runtime configuration read from the environment.
//!
//! The binary loads a `.env` file first (via `dotenvy`), so every variable
//! below can live there as well.

use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::fetch::{ApiKey, BasicClient, HttpClient, MTA_FEED_BASE_URL};
use crate::timestamp::DEFAULT_TIMEZONE;

pub const API_KEY_VAR: &str = "MTA_API_KEY";
pub const TIMEZONE_VAR: &str = "SUBWAY_TIMEZONE";
pub const BASE_URL_VAR: &str = "SUBWAY_FEED_BASE_URL";
pub const RETRIES_VAR: &str = "SUBWAY_FETCH_RETRIES";
pub const TIMEOUT_VAR: &str = "SUBWAY_FETCH_TIMEOUT";

const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
    /// Zone used when displaying arrival times.
    pub timezone: Tz,
    /// Feed-group suffixes are appended to this.
    pub base_url: String,
    /// Attempts after the first failed one.
    pub retries: u32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            timezone: DEFAULT_TIMEZONE,
            base_url: MTA_FEED_BASE_URL.to_string(),
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable lookup. Unset and empty variables
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let timezone = match var(TIMEZONE_VAR) {
            Some(name) => parse_timezone(&name)?,
            None => defaults.timezone,
        };

        let retries = match var(RETRIES_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{RETRIES_VAR}='{raw}' is not a count")))?,
            None => defaults.retries,
        };

        let timeout = match var(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| Error::Config(format!("{TIMEOUT_VAR}='{raw}' is not seconds")))?,
            None => defaults.timeout,
        };

        Ok(Config {
            api_key: var(API_KEY_VAR),
            timezone,
            base_url: var(BASE_URL_VAR).unwrap_or(defaults.base_url),
            retries,
            timeout,
        })
    }

    /// The HTTP client for feed requests, authenticated when a key is set.
    pub fn http_client(&self) -> Result<Box<dyn HttpClient>> {
        let basic = BasicClient::with_timeout(self.timeout)?;
        Ok(match &self.api_key {
            Some(key) => Box::new(ApiKey::mta(basic, key)?),
            None => Box::new(basic),
        })
    }
}

/// Parses an IANA zone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::Config(format!("'{name}' is not a known timezone")))
}
