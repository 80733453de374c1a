//! Catalog domain: clients, products and orders.

mod memory;
mod models;
mod store;

pub use memory::MemoryCatalogStore;
pub use models::{Cliente, Orden, Producto};
pub use store::{CatalogStore, PgCatalogStore, LIST_CLIENTS, LIST_ORDERS, LIST_PRODUCTS};
