//! Database configuration parsing from environment variables.

use crate::infrastructure::persistence::database::DEFAULT_MAX_CONNECTIONS;
use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://volleyroster.db";

/// Database environment configuration
#[derive(Debug, Clone)]
pub struct DatabaseEnvConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseEnvConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseEnvConfig {
    pub fn from_env() -> Result<Self> {
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .context("Failed to parse DATABASE_MAX_CONNECTIONS")?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections,
        })
    }
}
