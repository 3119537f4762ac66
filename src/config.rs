//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::domain::DEFAULT_MAX_HORIZON_WEEKS;
use crate::report::{Aggregator, DEFAULT_WEEKS_PER_QUARTER};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Longest forecast accepted, in weeks
    pub max_horizon_weeks: u32,

    /// Quarter length used by the quarterly rollup
    pub weeks_per_quarter: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            max_horizon_weeks: DEFAULT_MAX_HORIZON_WEEKS,
            weeks_per_quarter: DEFAULT_WEEKS_PER_QUARTER,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = parse_or(&lookup, "PORT", defaults.port)?;

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);

        let max_horizon_weeks = parse_or(&lookup, "MAX_HORIZON_WEEKS", defaults.max_horizon_weeks)?;
        if max_horizon_weeks == 0 {
            return Err(ConfigError::InvalidValue("MAX_HORIZON_WEEKS"));
        }

        let weeks_per_quarter = parse_or(&lookup, "WEEKS_PER_QUARTER", defaults.weeks_per_quarter)?;
        if weeks_per_quarter == 0 {
            return Err(ConfigError::InvalidValue("WEEKS_PER_QUARTER"));
        }

        Ok(Self {
            host,
            port,
            environment,
            max_horizon_weeks,
            weeks_per_quarter,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Aggregator configured with this horizon and quarter length
    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new()
            .with_max_horizon(self.max_horizon_weeks)
            .with_weeks_per_quarter(self.weeks_per_quarter)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
