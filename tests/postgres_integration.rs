//! Live PostgreSQL tests
//!
//! Require a reachable database in `DATABASE_URL` with the catalog schema
//! loaded. Run with `cargo test -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::FromRow;

use catalog_api::catalog::{CatalogStore, PgCatalogStore};
use catalog_api::config::DatabaseConfig;
use catalog_api::postgres::{BindValue, Database, DbError, Params, Statement};

#[derive(Debug, FromRow)]
struct Echo {
    value: String,
}

#[derive(Debug, FromRow)]
struct Count {
    total: i64,
}

const ECHO: Statement = Statement::new("echo", "SELECT :value::text AS value");

const COUNT_CLIENTES: Statement =
    Statement::new("count_clientes", "SELECT count(*) AS total FROM clientes");

#[derive(Debug, FromRow)]
struct Backend {
    pid: i32,
}

#[derive(Debug, FromRow)]
struct Terminated {
    killed: bool,
}

const BACKEND_PID: Statement = Statement::new("backend_pid", "SELECT pg_backend_pid() AS pid");

const SLOW: Statement = Statement::new("slow", "SELECT pg_sleep(3)::text AS value");

const TERMINATE: Statement =
    Statement::new("terminate", "SELECT pg_terminate_backend(:pid) AS killed");

fn database_with(max_connections: u32) -> Database {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").ok(),
        max_connections,
        ..DatabaseConfig::default()
    };
    Database::new(&config).expect("DATABASE_URL must be set for ignored tests")
}

fn database() -> Database {
    database_with(DatabaseConfig::default().max_connections)
}

#[tokio::test]
#[ignore]
async fn test_ping_round_trip() {
    tokio_test::assert_ok!(database().ping().await);
}

#[tokio::test]
#[ignore]
async fn test_injection_payload_is_bound_as_data() {
    let db = database();
    let payload = "\"); DROP TABLE clientes; --";

    let mut session = db.session().await.unwrap();
    let before: Vec<Count> = session
        .fetch_all(&COUNT_CLIENTES, &Params::None)
        .await
        .unwrap();
    let rows: Vec<Echo> = session
        .fetch_all(&ECHO, &Params::named([("value", payload)]))
        .await
        .unwrap();
    let after: Vec<Count> = session
        .fetch_all(&COUNT_CLIENTES, &Params::None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, payload);
    assert_eq!(before[0].total, after[0].total);
}

#[tokio::test]
#[ignore]
async fn test_invalid_sql_is_query_error_and_session_is_released() {
    const BROKEN: Statement = Statement::new("broken", "SELECT nope FROM tabla_inexistente");
    let db = database();

    {
        let mut session = db.session().await.unwrap();
        let result: Result<Vec<Count>, DbError> = session.fetch_all(&BROKEN, &Params::None).await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, DbError::Query(ref msg) if msg.contains("tabla_inexistente")));
    }

    // The failed session's connection goes back to the pool in the background
    tokio::time::sleep(Duration::from_millis(200)).await;
    let stats = db.pool_stats();
    assert_eq!(stats.idle as u32, stats.size);
}

#[tokio::test]
#[ignore]
async fn test_connection_lost_mid_statement_is_query_error() {
    let db = database();

    let mut victim = db.session().await.unwrap();
    let pid = victim
        .fetch_all::<Backend>(&BACKEND_PID, &Params::None)
        .await
        .unwrap()[0]
        .pid;

    let killer = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let mut session = db.session().await.unwrap();
        // `pid` is an i32 and binds as int4, matching the function signature
        session
            .fetch_all::<Terminated>(&TERMINATE, &Params::named([("pid", pid)]))
            .await
            .unwrap()
    };

    let (result, terminated) =
        tokio::join!(victim.fetch_all::<Echo>(&SLOW, &Params::None), killer);

    assert!(terminated[0].killed);
    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, DbError::Query(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
#[ignore]
async fn test_bigint_keys_decode() {
    const CREATE: Statement = Statement::new(
        "create_temp_clientes",
        "CREATE TEMP TABLE clientes (\
         id_cliente BIGSERIAL PRIMARY KEY, nombre TEXT NOT NULL, direccion TEXT, telefono TEXT)",
    );
    const INSERT: Statement = Statement::new(
        "insert_temp_cliente",
        "INSERT INTO clientes (id_cliente, nombre) VALUES (:id, :nombre) \
         RETURNING id_cliente::text AS value",
    );
    const DROP: Statement = Statement::new("drop_temp_clientes", "DROP TABLE pg_temp.clientes");

    // One connection, so the temporary table shadows `clientes` for the store too
    let db = database_with(1);
    let big_id: i64 = 5_000_000_000;

    {
        let mut session = db.session().await.unwrap();
        let _: Vec<Echo> = session.fetch_all(&CREATE, &Params::None).await.unwrap();
        let inserted: Vec<Echo> = session
            .fetch_all(
                &INSERT,
                &Params::named([("id", BindValue::from(big_id)), ("nombre", BindValue::from("Ana"))]),
            )
            .await
            .unwrap();
        assert_eq!(inserted[0].value, big_id.to_string());
    }

    let store = PgCatalogStore::new(db.clone());
    let clientes = store.list_clients().await;

    {
        let mut session = db.session().await.unwrap();
        let _: Vec<Echo> = session.fetch_all(&DROP, &Params::None).await.unwrap();
    }

    let clientes = tokio_test::assert_ok!(clientes);
    assert_eq!(clientes.len(), 1);
    assert_eq!(clientes[0].id_cliente, big_id);
    assert_eq!(clientes[0].nombre, "Ana");
}

#[tokio::test]
#[ignore]
async fn test_listings_are_ordered_by_id() {
    let store = Arc::new(PgCatalogStore::new(database()));

    let clientes = store.list_clients().await.unwrap();
    assert!(clientes.windows(2).all(|w| w[0].id_cliente < w[1].id_cliente));

    let productos = store.list_products().await.unwrap();
    assert!(productos.windows(2).all(|w| w[0].id_producto < w[1].id_producto));

    let ordenes = store.list_orders().await.unwrap();
    assert!(ordenes.windows(2).all(|w| w[0].id_orden < w[1].id_orden));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_sessions_share_the_pool() {
    let store = Arc::new(PgCatalogStore::new(database()));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.list_clients().await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));

    let stats = store.database().pool_stats();
    assert!(stats.size <= stats.max_connections);
}
