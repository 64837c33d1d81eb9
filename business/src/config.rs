//! Business configuration.
//!
//! Defaults match the console's reference timings (400 ms search debounce, 3 s status
//! auto-clear, 20 rows per page). Every field can be overridden through `USERDESK_*`
//! environment variables, read with `serde-env`.

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::users::PageSize;

/// Prefix of every environment variable read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "USERDESK_";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;
const DEFAULT_STATUS_CLEAR_MS: u64 = 3_000;
const MAX_TIMER_MS: u64 = 3_600_000;

/// Which completed list fetch is allowed to replace the displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FetchOrdering {
    /// Every completed fetch applies its result; the list shows whichever finished last.
    #[default]
    #[serde(rename = "last-response")]
    LastResponseWins,
    /// Only the most recently dispatched fetch may apply its result.
    #[serde(rename = "latest-request")]
    LatestRequestWins,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read USERDESK_* environment: {0}")]
    Env(String),
    #[error("USERDESK_PAGE_SIZE must be one of 10, 20, 50 (got {0})")]
    InvalidPageSize(u32),
    #[error("USERDESK_{name} must be at most {max} ms (got {value})", max = MAX_TIMER_MS)]
    TimerOutOfRange { name: &'static str, value: u64 },
    #[error("USERDESK_API_BASE_URL must not be empty")]
    EmptyApiBaseUrl,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    search_debounce_ms: Option<u64>,
    #[serde(default)]
    status_clear_ms: Option<u64>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    fetch_ordering: Option<FetchOrdering>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Base URL of the remote service, without the `/api` suffix.
    pub api_base_url: String,
    /// Quiet interval before typed search text becomes the stabilized search term.
    pub search_debounce_ms: u64,
    /// Delay before a success or error status reverts to idle.
    pub status_clear_ms: u64,
    pub default_page_size: PageSize,
    pub fetch_ordering: FetchOrdering,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            status_clear_ms: DEFAULT_STATUS_CLEAR_MS,
            default_page_size: PageSize::default(),
            fetch_ordering: FetchOrdering::default(),
        }
    }
}

impl BusinessConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Read `USERDESK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build a config from arbitrary `(name, value)` pairs.
    ///
    /// Names without the [`ENV_PREFIX`] are ignored; missing names keep their defaults.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(name, value)| {
                name.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|rest| (rest.to_owned(), value.into()))
            })
            .collect();

        let raw: RawConfig =
            serde_env::from_iter(scoped).map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = match raw.api_base_url {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::EmptyApiBaseUrl),
            Some(url) => url.trim().to_owned(),
            None => defaults.api_base_url,
        };

        let default_page_size = match raw.page_size {
            Some(size) => PageSize::try_from(size).map_err(ConfigError::InvalidPageSize)?,
            None => defaults.default_page_size,
        };

        Ok(Self {
            api_base_url,
            search_debounce_ms: checked_timer(
                "SEARCH_DEBOUNCE_MS",
                raw.search_debounce_ms.unwrap_or(defaults.search_debounce_ms),
            )?,
            status_clear_ms: checked_timer(
                "STATUS_CLEAR_MS",
                raw.status_clear_ms.unwrap_or(defaults.status_clear_ms),
            )?,
            default_page_size,
            fetch_ordering: raw.fetch_ordering.unwrap_or(defaults.fetch_ordering),
        })
    }

    /// Join the base URL and an API path.
    ///
    /// A trailing `/` on the base and a missing leading `/` on the path are both tolerated.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn search_debounce(&self) -> Duration {
        timer_duration(self.search_debounce_ms)
    }

    pub fn status_clear_delay(&self) -> Duration {
        timer_duration(self.status_clear_ms)
    }
}

fn checked_timer(name: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value > MAX_TIMER_MS {
        return Err(ConfigError::TimerOutOfRange { name, value });
    }
    Ok(value)
}

fn timer_duration(millis: u64) -> Duration {
    // Both timers are capped at an hour, which always fits.
    Duration::milliseconds(i64::try_from(millis.min(MAX_TIMER_MS)).unwrap_or(0))
}
