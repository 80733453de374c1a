use std::sync::Arc;

use crate::catalog::{CatalogStore, PgCatalogStore};
use crate::config::Settings;
use crate::postgres::{Database, DbError};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<dyn CatalogStore>,
    /// Connection provider, absent when running on a non-database store
    pub database: Option<Database>,
}

impl AppState {
    /// Build state backed by PostgreSQL. Fails only on configuration errors;
    /// the first connection is opened on first use.
    pub fn new(settings: Settings) -> Result<Self, DbError> {
        let database = Database::new(&settings.database)?;
        let catalog = Arc::new(PgCatalogStore::new(database.clone()));

        Ok(Self {
            settings: Arc::new(settings),
            catalog,
            database: Some(database),
        })
    }

    /// Build state around an arbitrary catalog store.
    pub fn with_store(settings: Settings, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog,
            database: None,
        }
    }

    /// Release pooled connections.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}
