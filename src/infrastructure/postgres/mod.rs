//! PostgreSQL access layer.
//!
//! - `target`: resolves and normalizes the connection target
//! - `pool`: the connection provider (`Database`)
//! - `session`: scoped connection lending
//! - `query`: literal statements and bind parameters

pub mod error;
pub mod pool;
pub mod query;
pub mod session;
pub mod target;

pub use error::DbError;
pub use pool::{Database, PoolStats};
pub use query::{BindValue, Params, Statement};
pub use session::Session;
pub use target::{normalize_url, ConnectionTarget};
