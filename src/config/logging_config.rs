//! Logging configuration parsing from environment variables.
//!
//! Verbosity itself comes from `RUST_LOG` through `EnvFilter`; this only
//! selects the output shape.

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// tracing-subscriber fmt layer style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => anyhow::bail!("Invalid LOG_FORMAT: {}. Must be 'pretty' or 'compact'", s),
        }
    }
}

/// Logging environment configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingEnvConfig {
    pub format: LogFormat,
    pub with_target: bool,
}

impl LoggingEnvConfig {
    pub fn from_env() -> Result<Self> {
        let format = match env::var("LOG_FORMAT") {
            Ok(value) => LogFormat::from_str(&value)?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            format,
            with_target: env::var("LOG_WITH_TARGET")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
        })
    }
}
