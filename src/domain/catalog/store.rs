//! Catalog store abstraction and its PostgreSQL implementation.

use async_trait::async_trait;

use crate::postgres::{Database, DbError, Params, Statement};

use super::models::{Cliente, Orden, Producto};

// Integer columns are widened to int8 and `precio` to float8, so the records
// decode whether the schema uses INTEGER, BIGINT, NUMERIC or REAL columns.

pub const LIST_CLIENTS: Statement = Statement::new(
    "list_clients",
    "SELECT id_cliente::int8 AS id_cliente, nombre, direccion, telefono \
     FROM clientes ORDER BY id_cliente",
);

pub const LIST_PRODUCTS: Statement = Statement::new(
    "list_products",
    "SELECT id_producto::int8 AS id_producto, nombre, descripcion, precio::float8 AS precio, \
     stock::int8 AS stock, id_categoria::int8 AS id_categoria \
     FROM productos ORDER BY id_producto",
);

pub const LIST_ORDERS: Statement = Statement::new(
    "list_orders",
    "SELECT id_orden::int8 AS id_orden, tipo_orden, id_cliente::int8 AS id_cliente \
     FROM ordenes ORDER BY id_orden",
);

/// Read access to the catalog tables.
///
/// Every list is complete and ordered by primary key; a failure fails the
/// whole call, never a partial list.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Cliente>, DbError>;

    async fn list_products(&self) -> Result<Vec<Producto>, DbError>;

    async fn list_orders(&self) -> Result<Vec<Orden>, DbError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), DbError>;

    /// Backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// PostgreSQL-backed catalog.
///
/// Each call opens its own session, runs one statement and releases the
/// session before returning.
pub struct PgCatalogStore {
    db: Database,
}

impl PgCatalogStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_clients(&self) -> Result<Vec<Cliente>, DbError> {
        let mut session = self.db.session().await?;
        session.fetch_all(&LIST_CLIENTS, &Params::None).await
    }

    async fn list_products(&self) -> Result<Vec<Producto>, DbError> {
        let mut session = self.db.session().await?;
        session.fetch_all(&LIST_PRODUCTS, &Params::None).await
    }

    async fn list_orders(&self) -> Result<Vec<Orden>, DbError> {
        let mut session = self.db.session().await?;
        session.fetch_all(&LIST_ORDERS, &Params::None).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.db.ping().await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_statements_order_by_primary_key() {
        assert!(LIST_CLIENTS.sql.ends_with("ORDER BY id_cliente"));
        assert!(LIST_PRODUCTS.sql.ends_with("ORDER BY id_producto"));
        assert!(LIST_ORDERS.sql.ends_with("ORDER BY id_orden"));
    }

    #[test]
    fn test_integer_columns_are_widened() {
        assert!(LIST_CLIENTS.sql.contains("id_cliente::int8 AS id_cliente"));
        for column in ["id_producto", "stock", "id_categoria"] {
            let cast = format!("{column}::int8 AS {column}");
            assert!(LIST_PRODUCTS.sql.contains(&cast), "{}", column);
        }
        assert!(LIST_ORDERS.sql.contains("id_orden::int8 AS id_orden"));
        assert!(LIST_ORDERS.sql.contains("id_cliente::int8 AS id_cliente"));
    }

    #[test]
    fn test_list_statements_take_no_parameters() {
        for statement in [LIST_CLIENTS, LIST_PRODUCTS, LIST_ORDERS] {
            assert!(!statement.sql.contains('$'), "{}", statement.name);
            let (sql, binds) = Params::None.prepare(statement.sql).unwrap();
            assert_eq!(sql, statement.sql);
            assert!(binds.is_empty());
        }
    }
}
