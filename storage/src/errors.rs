//! Custom error types specific to the `storage` crate.
//!
//! This module defines errors that can occur while connecting to, migrating
//! or querying the persistent store, providing a unified error type for every
//! store implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No database has been configured for this process.
    #[error("database not available")]
    NotConfigured,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row violates an invariant the schema should have enforced.
    #[error("corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },
}
