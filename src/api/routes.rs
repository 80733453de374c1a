use axum::{routing::get, Router};

use crate::server::AppState;

use super::catalog::{list_clientes, list_ordenes, list_productos};
use super::health::{health, root};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Liveness & DB probe
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Catalog listings
        .route("/clientes", get(list_clientes))
        .route("/productos", get(list_productos))
        .route("/ordenes", get(list_ordenes))
}
