//! Environment-driven configuration.
//!
//! Values come from raw environment variables (optionally seeded from a `.env`
//! file). Durations accept either a bare integer or a human-readable string such
//! as `250ms` or `8s`.

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port of the search proxy.
    pub port: u16,
    /// Base level for this crate's logs (`RUST_LOG` overrides it entirely).
    pub log_level: String,
    /// Cache store address; `memory://` selects the in-process store.
    pub redis_url: String,
    /// Seconds a cached upstream response stays fresh.
    pub cache_ttl: u64,
    pub tvmaze_base_url: String,
    /// Upstream requests allowed per ten-second window.
    pub upstream_rate_limit: u32,
    /// Quiet period before the client fetches a settled query.
    #[serde(deserialize_with = "deserialize_millis", serialize_with = "serialize_millis")]
    pub search_delay: Duration,
    /// Root URL of the proxy, as seen by the client.
    pub api_root_url: String,
    #[serde(deserialize_with = "deserialize_secs", serialize_with = "serialize_millis")]
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_owned(),
            redis_url: "redis://localhost:6379".to_owned(),
            cache_ttl: 10,
            tvmaze_base_url: "https://api.tvmaze.com".to_owned(),
            upstream_rate_limit: 20,
            search_delay: Duration::ZERO,
            api_root_url: "http://localhost:3000".to_owned(),
            shutdown_timeout: Duration::from_secs(8),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(&[
            "PORT",
            "LOG_LEVEL",
            "REDIS_URL",
            "CACHE_TTL",
            "TVMAZE_BASE_URL",
            "UPSTREAM_RATE_LIMIT",
            "SEARCH_DELAY",
            "API_ROOT_URL",
            "SHUTDOWN_TIMEOUT",
        ]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        let config: Config = Self::figment().extract()?;
        if config.cache_ttl == 0 {
            return Err(figment::Error::from("CACHE_TTL must be at least 1 second".to_owned()));
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

/// A duration given as a bare number in `unit`, or as a string parsed by `fundu`
/// (e.g. `"250ms"`, `"1.5s"`). Bare numeric strings also use `unit`.
fn deserialize_duration<'de, D>(
    deserializer: D,
    unit: fn(u64) -> Duration,
) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(unit(n)),
        Raw::Text(text) => {
            let text = text.trim();
            if let Ok(n) = text.parse::<u64>() {
                return Ok(unit(n));
            }
            fundu::parse_duration(text)
                .map_err(|e| serde::de::Error::custom(format!("invalid duration {text:?}: {e}")))
        }
    }
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    deserialize_duration(deserializer, Duration::from_millis)
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    deserialize_duration(deserializer, Duration::from_secs)
}

fn serialize_millis<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{}ms", value.as_millis()))
}
