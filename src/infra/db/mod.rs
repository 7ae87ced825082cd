//! Postgres adapter for the catalog store.
//!
//! Expects the upstream schema: `editions(id, name, type, description,
//! is_public)` and `books(id, edition_id, book_name, book_year, cover,
//! is_active)` with `book_year` stored as `DD.MM.YYYY` text.

mod editions;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::application::repos::RepoError;
use crate::config::DatabaseSettings;
use crate::infra::error::InfraError;

/// Shared Postgres-backed repository handle.
#[derive(Clone)]
pub struct PostgresRepositories {
    pool: PgPool,
}

impl PostgresRepositories {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, InfraError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.get())
            .connect(&settings.url)
            .await
            .map_err(|err| InfraError::database(err.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn map_sqlx_error(error: sqlx::Error) -> RepoError {
    match error {
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}
