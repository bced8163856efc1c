//! Module for database connection setup and common utilities.
//!
//! This module is responsible for opening the store once at startup and
//! handing every service a cheap, cloneable `Database` handle. A process can
//! run without a database: the handle then reports `StoreError::NotConfigured`
//! on every access and the services degrade instead of crashing.

use std::sync::Arc;

use storage::{SqliteStore, Store, StoreError};
use tracing::{info, warn};

use crate::config::Config;

#[derive(Clone, Default)]
pub struct Database {
    store: Option<Arc<dyn Store>>,
}

/// Connectivity as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Up,
    Down,
    Unconfigured,
}

impl DatabaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Unconfigured => "unconfigured",
        }
    }
}

impl Database {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store: Some(store) }
    }

    pub fn unavailable() -> Self {
        Self { store: None }
    }

    /// Opens the configured SQLite database. Connection or migration
    /// failures are logged and leave the handle unavailable.
    pub async fn connect(config: &Config) -> Self {
        let Some(url) = config.database_url.as_deref() else {
            warn!("DATABASE_URL not set, running without a database");
            return Self::unavailable();
        };

        match SqliteStore::connect(url, config.pool_settings()).await {
            Ok(store) => {
                info!("database connected");
                Self::new(Arc::new(store))
            }
            Err(err) => {
                warn!(error = %err, "failed to connect to database, continuing without it");
                Self::unavailable()
            }
        }
    }

    pub fn store(&self) -> Result<&dyn Store, StoreError> {
        self.store.as_deref().ok_or(StoreError::NotConfigured)
    }

    pub async fn status(&self) -> DatabaseStatus {
        match self.store() {
            Err(_) => DatabaseStatus::Unconfigured,
            Ok(store) => match store.ping().await {
                Ok(()) => DatabaseStatus::Up,
                Err(err) => {
                    warn!(error = %err, "database ping failed");
                    DatabaseStatus::Down
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_handle_reports_not_configured() {
        let db = Database::unavailable();
        assert!(matches!(db.store(), Err(StoreError::NotConfigured)));
        assert_eq!(db.status().await, DatabaseStatus::Unconfigured);
    }

    #[tokio::test]
    async fn in_memory_store_is_up() {
        let db = Database::new(Arc::new(SqliteStore::in_memory().await.unwrap()));
        assert_eq!(db.status().await, DatabaseStatus::Up);
    }
}
