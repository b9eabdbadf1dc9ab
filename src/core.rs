//! Core QueryHaus functionality
//!
//! This module contains the main QueryHaus struct, which owns the connection
//! pool and the mapping context and hands out entity templates.

use relational_core::{Dialect, EntityTemplate, MappingContext, PgExecutor, QueryError, StatementMapper};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::errors::QueryHausError;
use config::{AppConfig, DatabaseConfig};

/// Main QueryHaus coordinator that manages the database connection and mapping metadata
#[derive(Debug, Clone)]
pub struct QueryHaus {
    pool: PgPool,
    mapper: StatementMapper,
}

impl QueryHaus {
    /// Create new QueryHaus with database connection
    pub async fn new(config: &AppConfig) -> Result<Self, QueryHausError> {
        config.validate()?;

        let pool = pool_options(&config.database)
            .connect(&config.database.connection_string())
            .await?;

        tracing::info!(
            host = %config.database.host,
            database = %config.database.database,
            "Connected to database"
        );

        Self::with_pool(pool, config)
    }

    /// Create QueryHaus without connecting; connections open on first use
    pub fn connect_lazy(config: &AppConfig) -> Result<Self, QueryHausError> {
        config.validate()?;

        let pool = pool_options(&config.database)
            .connect_lazy(&config.database.connection_string())?;

        Self::with_pool(pool, config)
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: PgPool, config: &AppConfig) -> Result<Self, QueryHausError> {
        let context = MappingContext::from_config(&config.mapping, &config.cache)?;
        let dialect = Dialect::from(config.dialect.kind);
        debug_log!("QueryHaus using dialect {}", dialect.name());

        Ok(Self {
            pool,
            mapper: StatementMapper::new(dialect, context),
        })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn context(&self) -> &MappingContext {
        self.mapper.context()
    }

    pub fn mapper(&self) -> &StatementMapper {
        &self.mapper
    }

    pub fn dialect(&self) -> Dialect {
        self.mapper.dialect()
    }

    /// Renderer for another dialect sharing this instance's mapping context
    pub fn mapper_for(&self, dialect: Dialect) -> StatementMapper {
        StatementMapper::new(dialect, self.context().clone())
    }

    /// Template executing against the pool; requires the Postgres dialect
    pub fn template(&self) -> Result<EntityTemplate<PgExecutor>, QueryHausError> {
        if self.dialect() != Dialect::Postgres {
            return Err(QueryError::illegal_state(format!(
                "Statements rendered for {} cannot run on a PostgreSQL pool",
                self.dialect().name()
            ))
            .into());
        }

        Ok(EntityTemplate::new(
            PgExecutor::new(self.pool.clone()),
            self.mapper.clone(),
        ))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), QueryHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    // Set max lifetime if specified
    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    pool_options
}
