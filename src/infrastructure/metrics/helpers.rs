//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    DB_POOL_CONNECTIONS, DB_POOL_IDLE_CONNECTIONS, DB_QUERY_DURATION, DB_QUERY_ERRORS_TOTAL,
    DB_SESSIONS_ACTIVE, DB_SESSIONS_OPENED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording session lifecycle metrics
pub struct SessionMetrics;

impl SessionMetrics {
    /// Record a session taking a connection from the pool
    pub fn record_opened() {
        DB_SESSIONS_OPENED_TOTAL.inc();
        DB_SESSIONS_ACTIVE.inc();
    }

    /// Record a session handing its connection back
    pub fn record_released() {
        DB_SESSIONS_ACTIVE.dec();
    }
}

/// Helper struct for recording query metrics
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record statement latency
    pub fn record_duration(statement: &str, seconds: f64) {
        DB_QUERY_DURATION
            .with_label_values(&[statement])
            .observe(seconds);
    }

    /// Record a failed statement
    pub fn record_error(statement: &str, kind: &str) {
        DB_QUERY_ERRORS_TOTAL
            .with_label_values(&[statement, kind])
            .inc();
    }
}

/// Helper struct for pool gauges
pub struct PoolMetrics;

impl PoolMetrics {
    /// Update pool gauges
    pub fn set(size: u32, idle: usize) {
        DB_POOL_CONNECTIONS.set(size as i64);
        DB_POOL_IDLE_CONNECTIONS.set(idle as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_metrics_are_encoded() {
        QueryMetrics::record_duration("helpers_test", 0.002);
        QueryMetrics::record_error("helpers_test", "query");

        let output = encode_metrics().unwrap();
        assert!(output.contains("catalog_db_query_duration_seconds"));
        assert!(output.contains("statement=\"helpers_test\""));
    }

    #[test]
    fn test_session_counter_increments() {
        let before = DB_SESSIONS_OPENED_TOTAL.get();
        SessionMetrics::record_opened();
        SessionMetrics::record_released();
        assert!(DB_SESSIONS_OPENED_TOTAL.get() > before);
    }
}
