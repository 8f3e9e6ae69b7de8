//! TargetUZ Database Layer
//!
//! PostgreSQL persistence for the platform. Wallets, orders, and the
//! append-only transaction ledger live here, together with the durable
//! settlement engine ([`payments::PaymentsRepo`]).
//!
//! # Repository Pattern
//!
//! Each domain has its own repository with CRUD and domain-specific
//! queries. Balance reads always hit the database; nothing is cached
//! across requests, so no settlement decision ever sees a stale balance.

pub mod config;
pub mod error;
pub mod models;
pub mod payments;
pub mod repos;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use models::*;
pub use payments::PaymentsRepo;
pub use repos::*;

/// Database connection pool
pub struct Database {
    /// PostgreSQL connection pool
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to PostgreSQL: {}", config.postgres_url_masked());

        let pg = PgPoolOptions::new()
            .max_connections(config.pg_max_connections)
            .min_connections(config.pg_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.pg_acquire_timeout_secs))
            .connect(&config.postgres_url)
            .await
            .map_err(|e| DbError::Connection(format!("PostgreSQL: {}", e)))?;

        info!("Connected to PostgreSQL");

        Ok(Self { pg })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pg)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pg).await.is_ok()
    }

    /// Create repository instances
    pub fn user_repo(&self) -> UserRepo {
        UserRepo::new(self.pg.clone())
    }

    pub fn wallet_repo(&self) -> WalletRepo {
        WalletRepo::new(self.pg.clone())
    }

    pub fn order_repo(&self) -> OrderRepo {
        OrderRepo::new(self.pg.clone())
    }

    pub fn transaction_repo(&self) -> TransactionRepo {
        TransactionRepo::new(self.pg.clone())
    }

    pub fn payments_repo(&self) -> PaymentsRepo {
        PaymentsRepo::new(self.pg.clone())
    }
}
