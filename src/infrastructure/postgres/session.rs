//! Session scope: one pooled connection lent for one unit of work.

use std::time::Instant;

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres};

use crate::metrics::{QueryMetrics, SessionMetrics};

use super::query::{bind_all, Params, Statement};
use super::DbError;

/// An active, lent connection.
///
/// The connection goes back to the pool when the session is dropped, which
/// covers normal return, `?` propagation and cancellation of the owning
/// future alike. Sessions are not `Clone` and are never shared between
/// requests.
pub struct Session {
    conn: PoolConnection<Postgres>,
}

impl Session {
    pub(crate) fn new(conn: PoolConnection<Postgres>) -> Self {
        SessionMetrics::record_opened();
        tracing::trace!("Session opened");
        Self { conn }
    }

    /// Run a read statement once and materialize every row.
    ///
    /// Rows are decoded by column name into `T`, in the order the engine
    /// returns them (the statement's `ORDER BY`). Any failure after the
    /// connection was lent, including losing it mid-statement, is a
    /// `DbError::Query`.
    pub async fn fetch_all<T>(&mut self, statement: &Statement, params: &Params) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let (sql, binds) = params.prepare(statement.sql).inspect_err(|e| {
            QueryMetrics::record_error(statement.name, e.kind());
        })?;

        let start = Instant::now();
        let query = bind_all(sqlx::query_as::<_, T>(&sql), binds);
        let result = query.fetch_all(&mut *self.conn).await;
        let elapsed = start.elapsed();
        QueryMetrics::record_duration(statement.name, elapsed.as_secs_f64());

        match result {
            Ok(rows) => {
                tracing::debug!(
                    statement = statement.name,
                    rows = rows.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Statement executed"
                );
                Ok(rows)
            }
            Err(e) => {
                let err = DbError::from(e).during_execution();
                QueryMetrics::record_error(statement.name, err.kind());
                tracing::warn!(
                    statement = statement.name,
                    kind = err.kind(),
                    error = %err,
                    "Statement failed"
                );
                Err(err)
            }
        }
    }

    /// Lightweight round-trip to confirm the connection is usable.
    pub async fn probe(&mut self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(DbError::from)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        SessionMetrics::record_released();
        tracing::trace!("Session released");
    }
}
