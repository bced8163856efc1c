//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the listen address, the database URL and pool limits, the JWT secret and
//! the verification policy thresholds. Every value can be given as a CLI flag
//! or an environment variable (a `.env` file is loaded first by the binary).

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use storage::PoolSettings;
use thiserror::Error;

use crate::services::classification::{PolicyError, VerificationPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be at least {min} characters")]
    WeakSecret { min: usize },

    #[error("DATABASE_MAX_CONNECTIONS must be at least 1")]
    NoConnections,

    #[error("invalid verification policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Colada Finder backend
#[derive(Parser, Debug, Clone)]
#[command(name = "colada-backend")]
#[command(about = "Crowd verification service for bars that serve piña coladas")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// SQLite database URL. When unset the service still starts, reads
    /// return neutral defaults and writes fail with 503.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    pub database_max_connections: u32,

    /// How long a request waits for a pooled connection, in milliseconds
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_MS", default_value = "5000")]
    pub database_acquire_timeout_ms: u64,

    /// HS256 secret used to validate bearer tokens
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Minimum number of votes before a place can count as verified
    #[arg(long, env = "VERIFY_MIN_SAMPLES", default_value_t = VerificationPolicy::DEFAULT_MIN_SAMPLES)]
    pub verify_min_samples: u32,

    /// Minimum share of "yes" votes for a place to count as verified
    #[arg(long, env = "VERIFY_MIN_RATIO", default_value_t = VerificationPolicy::DEFAULT_MIN_RATIO)]
    pub verify_min_ratio: f64,
}

impl Config {
    pub const MIN_SECRET_LEN: usize = 32;

    /// Checks cross-field constraints clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min: Self::MIN_SECRET_LEN,
            });
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        self.policy()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<VerificationPolicy, PolicyError> {
        VerificationPolicy::new(self.verify_min_samples, self.verify_min_ratio)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.database_max_connections,
            acquire_timeout: Duration::from_millis(self.database_acquire_timeout_ms),
        }
    }
}
