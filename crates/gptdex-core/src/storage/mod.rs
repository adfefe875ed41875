//! Database access layer for the gptdex services.
//!
//! All SQL lives in this module. The profile service shares one pool through
//! [`Storage`]; the media listing path opens its own short-lived connection
//! per request and goes through [`media::fetch_page`].

use std::sync::Arc;

use sqlx::PgPool;

pub mod media;
pub mod profiles;

use crate::error::Result;

/// Container for repository instances backed by a shared connection pool.
#[derive(Clone)]
pub struct Storage {
    /// Repository for GPT profile operations.
    pub profiles: Arc<profiles::Repository>,
}

impl Storage {
    /// Creates a new storage instance with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);

        Self { profiles: Arc::new(profiles::Repository::new(pool)) }
    }

    /// Performs a health check on the database connection.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the connection is unhealthy or the
    /// query times out.
    pub async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&*self.profiles.pool()).await?;

        Ok(())
    }
}
