//! Catalog listing endpoints.

use axum::{extract::State, Json};

use crate::catalog::{Cliente, Orden, Producto};
use crate::error::Result;
use crate::server::AppState;

/// GET /clientes - all clients ordered by id
pub async fn list_clientes(State(state): State<AppState>) -> Result<Json<Vec<Cliente>>> {
    let rows = state.catalog.list_clients().await?;
    Ok(Json(rows))
}

/// GET /productos - all products ordered by id
pub async fn list_productos(State(state): State<AppState>) -> Result<Json<Vec<Producto>>> {
    let rows = state.catalog.list_products().await?;
    Ok(Json(rows))
}

/// GET /ordenes - all orders ordered by id
pub async fn list_ordenes(State(state): State<AppState>) -> Result<Json<Vec<Orden>>> {
    let rows = state.catalog.list_orders().await?;
    Ok(Json(rows))
}
