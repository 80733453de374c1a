//! Database error taxonomy.

use thiserror::Error;

/// Errors surfaced by the connection provider, sessions and the query executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DbError {
    /// Missing or invalid connection target
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A connection could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine rejected the statement or it failed mid-execution
    #[error("Query error: {0}")]
    Query(String),
}

impl DbError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DbError::Configuration(_) => "configuration",
            DbError::Connection(_) => "connection",
            DbError::Query(_) => "query",
        }
    }

    /// Reclassify a failure raised while a statement was running.
    ///
    /// Once a connection has been lent, losing it mid-statement fails the
    /// statement: it is reported as a query error with the original message.
    pub fn during_execution(self) -> Self {
        match self {
            DbError::Connection(msg) => DbError::Query(msg),
            other => other,
        }
    }
}

/// SQLSTATE classes that describe a broken or refused connection rather than a bad statement.
fn is_connection_sqlstate(code: &str) -> bool {
    code.starts_with("08") // connection_exception
        || code.starts_with("28") // invalid_authorization_specification
        || code == "3D000" // invalid_catalog_name
        || code == "53300" // too_many_connections
        || code == "57P01" // admin_shutdown
        || code == "57P02" // crash_shutdown
        || code == "57P03" // cannot_connect_now
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Configuration(e) => DbError::Configuration(e.to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::Connection(err.to_string()),
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                match db.code() {
                    Some(code) if is_connection_sqlstate(&code) => DbError::Connection(message),
                    _ => DbError::Query(message),
                }
            }
            _ => DbError::Query(err.to_string()),
        }
    }
}
