//! Persistence gateway.
//!
//! [`Shared`] owns at most one live handle per process. The handle is
//! opened on first use and reused afterwards; callers that race on first
//! use wait on the same in-flight attempt. A failed attempt leaves the
//! cell empty so the next caller tries again.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::OnceCell;

use crate::utils::error::AppError;

/// Opens the underlying handle. Implemented by the Postgres and blob
/// storage connectors.
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    type Handle: Send + Sync;

    async fn connect(&self) -> Result<Self::Handle, AppError>;
}

pub struct Shared<C: Connect> {
    connector: C,
    cell: OnceCell<C::Handle>,
}

impl<C: Connect> Shared<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&C::Handle, AppError> {
        self.cell
            .get_or_try_init(|| self.connector.connect())
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }
}

pub struct PgConnector {
    database_url: String,
    max_connections: u32,
}

impl PgConnector {
    pub fn new(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections,
        }
    }
}

#[async_trait]
impl Connect for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.database_url)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to connect to database");
                AppError::DatabaseError(e)
            })?;

        tracing::info!("Successfully connected to database");
        Ok(pool)
    }
}

pub type Database = Shared<PgConnector>;

impl Database {
    pub fn postgres(database_url: impl Into<String>, max_connections: u32) -> Self {
        Shared::new(PgConnector::new(database_url, max_connections))
    }

    pub async fn pool(&self) -> Result<&PgPool, AppError> {
        self.get().await
    }
}
