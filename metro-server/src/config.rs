//! Server configuration.
//!
//! Every setting has a default and can be overridden by an environment
//! variable. Values that are present but unparsable are errors rather than
//! being silently replaced by the default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::planner::Tariff;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for the HTTP server and the route engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// JSON snapshot the network is loaded from at startup.
    pub network_file: PathBuf,

    pub cache: CacheConfig,

    pub tariff: Tariff,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            network_file: PathBuf::from("data/network.json"),
            cache: CacheConfig::default(),
            tariff: Tariff::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let vars = Vars { lookup: &lookup };

        vars.set("METRO_BIND_ADDR", &mut config.bind_addr)?;
        vars.set("METRO_NETWORK_FILE", &mut config.network_file)?;

        let mut ttl_secs = config.cache.ttl.as_secs();
        vars.set("METRO_CACHE_TTL_SECS", &mut ttl_secs)?;
        config.cache.ttl = Duration::from_secs(ttl_secs);
        vars.set("METRO_CACHE_CAPACITY", &mut config.cache.max_capacity)?;

        let tariff = &mut config.tariff;
        vars.set_amount("METRO_BASE_FARE", &mut tariff.base_fare)?;
        vars.set("METRO_BASE_FARE_STATIONS", &mut tariff.base_fare_stations)?;
        vars.set_amount("METRO_FARE_PER_STATION", &mut tariff.fare_per_station)?;
        vars.set_amount("METRO_FARE_PER_INTERCHANGE", &mut tariff.fare_per_interchange)?;
        vars.set_amount("METRO_MINUTES_PER_HOP", &mut tariff.minutes_per_hop)?;
        vars.set_amount(
            "METRO_MINUTES_PER_INTERCHANGE",
            &mut tariff.minutes_per_interchange,
        )?;

        Ok(config)
    }
}

struct Vars<'a, F> {
    lookup: &'a F,
}

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Overwrite `target` if the variable is set.
    fn set<T>(&self, key: &'static str, target: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = (self.lookup)(key) else {
            return Ok(());
        };

        *target = value.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Like `set`, for tariff amounts, which must be finite and non-negative.
    fn set_amount(&self, key: &'static str, target: &mut f64) -> Result<(), ConfigError> {
        let mut amount = *target;
        self.set(key, &mut amount)?;

        if !(amount.is_finite() && amount >= 0.0) {
            return Err(ConfigError {
                key,
                value: amount.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }

        *target = amount;
        Ok(())
    }
}
