//! Prometheus metrics for the catalog API.
//!
//! - Session metrics (active and total sessions lent from the pool)
//! - Query metrics (latency and failures per statement)
//! - Pool metrics (open and idle connections)

mod helpers;

pub use helpers::{encode_metrics, PoolMetrics, QueryMetrics, SessionMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "catalog";

lazy_static! {
    // ============================================================================
    // Session Metrics
    // ============================================================================

    /// Sessions currently holding a pooled connection
    pub static ref DB_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_db_sessions_active", METRIC_PREFIX),
        "Number of sessions currently holding a pooled connection"
    ).unwrap();

    /// Total sessions opened
    pub static ref DB_SESSIONS_OPENED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_db_sessions_opened_total", METRIC_PREFIX),
        "Total sessions opened"
    ).unwrap();

    // ============================================================================
    // Query Metrics
    // ============================================================================

    /// Statement execution latency by statement name
    pub static ref DB_QUERY_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_db_query_duration_seconds", METRIC_PREFIX),
        "Statement execution latency in seconds",
        &["statement"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]
    ).unwrap();

    /// Failed statements by statement name and error kind
    pub static ref DB_QUERY_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_db_query_errors_total", METRIC_PREFIX),
        "Total failed statements",
        &["statement", "kind"]
    ).unwrap();

    // ============================================================================
    // Pool Metrics
    // ============================================================================

    /// Connections currently open in the pool
    pub static ref DB_POOL_CONNECTIONS: IntGauge = register_int_gauge!(
        format!("{}_db_pool_connections", METRIC_PREFIX),
        "Connections currently open in the pool"
    ).unwrap();

    /// Idle connections in the pool
    pub static ref DB_POOL_IDLE_CONNECTIONS: IntGauge = register_int_gauge!(
        format!("{}_db_pool_idle_connections", METRIC_PREFIX),
        "Idle connections in the pool"
    ).unwrap();
}
