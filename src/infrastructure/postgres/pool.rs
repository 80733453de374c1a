//! Connection provider backed by a lazily connected sqlx pool.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::metrics::PoolMetrics;

use super::{ConnectionTarget, DbError, Session};

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub max_connections: u32,
}

/// The only component allowed to open database connections.
///
/// Constructed once at startup and shared through application state.
/// No connection is opened until the first session is requested; pooled
/// connections are pinged before being lent out and silently replaced when
/// dead.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    target: ConnectionTarget,
    max_connections: u32,
}

impl Database {
    /// Build the provider from configuration. Performs no network I/O.
    pub fn new(config: &DatabaseConfig) -> Result<Self, DbError> {
        let target = ConnectionTarget::resolve(config)?;
        Self::with_target(target, config)
    }

    pub fn with_target(target: ConnectionTarget, config: &DatabaseConfig) -> Result<Self, DbError> {
        let mut connect_options = target.connect_options()?;
        if config.statement_timeout_seconds > 0 {
            connect_options = connect_options.options([(
                "statement_timeout",
                format!("{}s", config.statement_timeout_seconds),
            )]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
            .test_before_acquire(config.test_before_acquire)
            .connect_lazy_with(connect_options);

        tracing::info!(
            target_url = %target,
            max_connections = config.max_connections,
            acquire_timeout_seconds = config.acquire_timeout_seconds,
            "PostgreSQL connection pool configured"
        );

        Ok(Self {
            pool,
            target,
            max_connections: config.max_connections,
        })
    }

    /// Borrow a connection for one unit of work.
    pub async fn session(&self) -> Result<Session, DbError> {
        let conn = self.pool.acquire().await.map_err(|e| {
            let err = DbError::from(e);
            tracing::warn!(error = %err, "Failed to acquire database connection");
            // Anything that stops us from getting a connection is a connection failure
            match err {
                DbError::Query(msg) => DbError::Connection(msg),
                other => other,
            }
        })?;
        Ok(Session::new(conn))
    }

    /// Acquire a session and run a trivial statement.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut session = self.session().await?;
        session.probe().await
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn pool_stats(&self) -> PoolStats {
        let stats = PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max_connections: self.max_connections,
        };
        PoolMetrics::set(stats.size, stats.idle);
        stats
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close every pooled connection. Later sessions fail with a connection error.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Some(url.to_string()),
            acquire_timeout_seconds: 1,
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn test_construction_is_lazy() {
        // Nothing listens on port 1; construction must still succeed
        let db = Database::new(&config("postgres://u:p@127.0.0.1:1/app")).unwrap();
        assert_eq!(db.target().as_str(), "postgresql://u:p@127.0.0.1:1/app");

        let stats = db.pool_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_connections, 10);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let db = Database::new(&config("postgresql://u:p@127.0.0.1:1/app")).unwrap();
        let err = db.ping().await.unwrap_err();
        assert_eq!(err.kind(), "connection");
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_sessions() {
        let db = Database::new(&config("postgresql://u:p@127.0.0.1:1/app")).unwrap();
        db.close().await;
        assert!(db.is_closed());
        assert!(matches!(db.session().await, Err(DbError::Connection(_))));
    }

    #[test]
    fn test_missing_target_fails_before_pool_exists() {
        let err = Database::new(&DatabaseConfig::default()).err().unwrap();
        assert!(matches!(err, DbError::Configuration(_)));
    }
}
