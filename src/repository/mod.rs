//! Persistence boundary for user records.
//!
//! The service layer only depends on [`UserRepository`]; the concrete backends
//! live in [`memory`] and [`mysql`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::DatabaseSettings;

/// Persistence-shaped user record.
pub mod entity;

/// Process-local repository backed by an ordered map.
pub mod memory;

/// MySQL repository backed by a `sqlx` pool.
pub mod mysql;

pub use entity::User;
pub use memory::InMemoryUserRepository;
pub use mysql::MySqlUserRepository;

/// Failure kinds reported by a [`UserRepository`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No record matched the criteria or identifier.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint (the email, compared case-sensitively) was violated.
    #[error("duplicate entry")]
    DuplicateEntry,

    /// The database rejected or failed the query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Storage operations the service layer relies on.
///
/// Criteria and patch records treat empty strings and a zero id as "not set".
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the first record (lowest id) matching every set field of `criteria`.
    async fn find_by(&self, criteria: &User) -> Result<User, RepositoryError>;

    /// Inserts a new record and returns it with its generated id and timestamps.
    async fn store(&self, record: User) -> Result<User, RepositoryError>;

    /// Applies the non-empty fields of `record` to the row identified by its id.
    async fn update(&self, record: &User) -> Result<(), RepositoryError>;

    /// Deletes the row identified by the id of `record`.
    async fn destroy(&self, record: &User) -> Result<(), RepositoryError>;
}

/// Builds the repository selected by `settings`.
///
/// Connects to MySQL and applies migrations when a url is configured, and
/// falls back to an empty in-memory store otherwise.
///
/// # Errors
/// Fails if the pool cannot connect or the migrations cannot be applied.
pub async fn from_settings(settings: &DatabaseSettings) -> crate::Result<Arc<dyn UserRepository>> {
    match &settings.url {
        Some(url) => {
            let repository = MySqlUserRepository::connect(url, settings.max_connections).await?;
            repository.migrate().await?;
            info!("Connected to MySQL user store");
            Ok(Arc::new(repository))
        }
        None => {
            warn!("No database url configured, users are kept in memory");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}
