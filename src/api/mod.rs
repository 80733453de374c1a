//! API layer - HTTP endpoint handlers.

mod catalog;
mod health;
mod metrics;
mod routes;

pub use catalog::{list_clientes, list_ordenes, list_productos};
pub use health::{health, root, HealthResponse, RootResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
