//! Configuration module for volleyroster.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Database and Logging.

mod database_config;
mod logging_config;

pub use database_config::DatabaseEnvConfig;
pub use logging_config::{LogFormat, LoggingEnvConfig};

use anyhow::{Context, Result};
use std::env;

/// How many condition records the player detail view shows
pub const DEFAULT_RECENT_CONDITION_LIMIT: usize = 10;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Database (from DatabaseEnvConfig)
    pub database_url: String,
    pub database_max_connections: u32,

    // Logging (from LoggingEnvConfig)
    pub log_format: LogFormat,
    pub log_with_target: bool,

    // Roster views
    pub recent_condition_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database = DatabaseEnvConfig::from_env().context("Failed to load database config")?;
        let logging = LoggingEnvConfig::from_env().context("Failed to load logging config")?;

        let recent_condition_limit = env::var("RECENT_CONDITION_LIMIT")
            .unwrap_or_else(|_| DEFAULT_RECENT_CONDITION_LIMIT.to_string())
            .parse::<usize>()
            .context("Failed to parse RECENT_CONDITION_LIMIT")?;

        Ok(Self {
            database_url: database.url,
            database_max_connections: database.max_connections,

            log_format: logging.format,
            log_with_target: logging.with_target,

            recent_condition_limit,
        })
    }
}
