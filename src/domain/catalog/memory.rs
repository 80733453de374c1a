//! In-memory catalog store.
//!
//! Rows live in memory and are lost on restart. Used for tests and local
//! demos without a database; a failure can be injected to exercise the
//! degraded paths.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::postgres::DbError;

use super::models::{Cliente, Orden, Producto};
use super::store::CatalogStore;

#[derive(Default)]
struct Tables {
    clientes: BTreeMap<i64, Cliente>,
    productos: BTreeMap<i64, Producto>,
    ordenes: BTreeMap<i64, Orden>,
}

/// In-memory catalog keyed by primary key, so lists come back in id order
/// whatever the insertion order was.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
    failure: RwLock<Option<DbError>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a client.
    pub async fn insert_client(&self, cliente: Cliente) {
        self.tables
            .write()
            .await
            .clientes
            .insert(cliente.id_cliente, cliente);
    }

    /// Insert or replace a product.
    pub async fn insert_product(&self, producto: Producto) {
        self.tables
            .write()
            .await
            .productos
            .insert(producto.id_producto, producto);
    }

    /// Insert or replace an order.
    pub async fn insert_order(&self, orden: Orden) {
        self.tables
            .write()
            .await
            .ordenes
            .insert(orden.id_orden, orden);
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`).
    pub async fn set_failure(&self, error: Option<DbError>) {
        *self.failure.write().await = error;
    }

    async fn check(&self) -> Result<(), DbError> {
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_clients(&self) -> Result<Vec<Cliente>, DbError> {
        self.check().await?;
        Ok(self.tables.read().await.clientes.values().cloned().collect())
    }

    async fn list_products(&self) -> Result<Vec<Producto>, DbError> {
        self.check().await?;
        Ok(self.tables.read().await.productos.values().cloned().collect())
    }

    async fn list_orders(&self) -> Result<Vec<Orden>, DbError> {
        self.check().await?;
        Ok(self.tables.read().await.ordenes.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.check().await
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
