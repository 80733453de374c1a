//! Record types returned by the catalog queries.
//!
//! Field order follows each statement's select-list, and serialization
//! preserves it.

use serde::Serialize;
use sqlx::FromRow;

/// A row of `clientes`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Cliente {
    pub id_cliente: i64,
    pub nombre: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
}

/// A row of `productos`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Producto {
    pub id_producto: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub stock: Option<i64>,
    pub id_categoria: Option<i64>,
}

/// A row of `ordenes`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Orden {
    pub id_orden: i64,
    pub tipo_orden: Option<String>,
    pub id_cliente: Option<i64>,
}

impl Cliente {
    pub fn new(id_cliente: i64, nombre: impl Into<String>) -> Self {
        Self {
            id_cliente,
            nombre: nombre.into(),
            direccion: None,
            telefono: None,
        }
    }
}

impl Producto {
    pub fn new(id_producto: i64, nombre: impl Into<String>, precio: f64) -> Self {
        Self {
            id_producto,
            nombre: nombre.into(),
            descripcion: None,
            precio: Some(precio),
            stock: None,
            id_categoria: None,
        }
    }
}

impl Orden {
    pub fn new(id_orden: i64, tipo_orden: impl Into<String>, id_cliente: i64) -> Self {
        Self {
            id_orden,
            tipo_orden: Some(tipo_orden.into()),
            id_cliente: Some(id_cliente),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(value: serde_json::Value) -> Vec<String> {
        value
            .as_object()
            .expect("record serializes as an object")
            .keys()
            .cloned()
            .collect()
    }

    #[test]
    fn test_cliente_keys_match_select_list() {
        let mut keys = keys(serde_json::to_value(Cliente::new(1, "A")).unwrap());
        keys.sort();
        assert_eq!(keys, vec!["direccion", "id_cliente", "nombre", "telefono"]);
    }

    #[test]
    fn test_producto_keys_match_select_list() {
        let mut keys = keys(serde_json::to_value(Producto::new(1, "Lapiz", 2.5)).unwrap());
        keys.sort();
        assert_eq!(
            keys,
            vec!["descripcion", "id_categoria", "id_producto", "nombre", "precio", "stock"]
        );
    }

    #[test]
    fn test_orden_keys_match_select_list() {
        let mut keys = keys(serde_json::to_value(Orden::new(1, "online", 2)).unwrap());
        keys.sort();
        assert_eq!(keys, vec!["id_cliente", "id_orden", "tipo_orden"]);
    }

    #[test]
    fn test_null_columns_serialize_as_null() {
        let value = serde_json::to_value(Cliente::new(3, "C")).unwrap();
        assert!(value["direccion"].is_null());
        assert!(value["telefono"].is_null());
    }

    #[test]
    fn test_ids_beyond_int4_range() {
        let value = serde_json::to_value(Orden::new(5_000_000_000, "online", 4_000_000_000)).unwrap();
        assert_eq!(value["id_orden"], 5_000_000_000_i64);
        assert_eq!(value["id_cliente"], 4_000_000_000_i64);
    }

    #[test]
    fn test_serialized_field_order_follows_select_list() {
        let json = serde_json::to_string(&Orden::new(5, "tienda", 9)).unwrap();
        assert_eq!(json, r#"{"id_orden":5,"tipo_orden":"tienda","id_cliente":9}"#);
    }
}
