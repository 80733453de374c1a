//! Connection target resolution and normalization.

use std::fmt;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

use crate::config::{DatabaseConfig, LOCAL_DATABASE_URL};

use super::DbError;

/// Scheme accepted by the driver.
pub const CANONICAL_SCHEME: &str = "postgresql://";

/// Equivalent scheme marker some hosting platforms hand out.
const GENERIC_SCHEME: &str = "postgres://";

/// Name of the variable that carries the connection target.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Rewrite a `postgres://` target to `postgresql://`.
///
/// Only the leading scheme is touched and only once, so applying this to an
/// already-normalized string returns it unchanged.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(GENERIC_SCHEME) {
        Some(rest) => format!("{}{}", CANONICAL_SCHEME, rest),
        None => trimmed.to_string(),
    }
}

/// A validated, normalized database location. Immutable once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    url: String,
}

impl ConnectionTarget {
    /// Resolve the target from configuration.
    ///
    /// A missing URL is a configuration error unless the local fallback is
    /// explicitly enabled.
    pub fn resolve(config: &DatabaseConfig) -> Result<Self, DbError> {
        let raw = match config.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ if config.allow_local_fallback => {
                tracing::warn!("{} is not set, using local fallback", DATABASE_URL_VAR);
                LOCAL_DATABASE_URL.to_string()
            }
            _ => {
                return Err(DbError::Configuration(format!(
                    "{} is not set",
                    DATABASE_URL_VAR
                )))
            }
        };

        Self::parse(&raw)
    }

    /// Normalize and validate a raw target string.
    pub fn parse(raw: &str) -> Result<Self, DbError> {
        let url = normalize_url(raw);

        if !url.starts_with(CANONICAL_SCHEME) {
            return Err(DbError::Configuration(format!(
                "{} must use the {} scheme",
                DATABASE_URL_VAR, CANONICAL_SCHEME
            )));
        }

        PgConnectOptions::from_str(&url).map_err(|e| {
            DbError::Configuration(format!("invalid {}: {}", DATABASE_URL_VAR, e))
        })?;

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Driver connect options for this target.
    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        PgConnectOptions::from_str(&self.url).map_err(DbError::from)
    }

    /// Target with the password replaced by `***`, safe for logs.
    pub fn masked(&self) -> String {
        if let Some(at_pos) = self.url.rfind('@') {
            let authority_start = CANONICAL_SCHEME.len();
            if let Some(colon_pos) = self.url[authority_start..at_pos].find(':') {
                let colon_pos = authority_start + colon_pos;
                let prefix = &self.url[..colon_pos + 1];
                let suffix = &self.url[at_pos..];
                return format!("{}***{}", prefix, suffix);
            }
        }
        self.url.clone()
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionTarget").field(&self.masked()).finish()
    }
}
