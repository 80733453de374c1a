//! Parametrized read statements and their bind values.
//!
//! Statement text is always a `&'static str`: caller data only ever reaches
//! the engine as a bind parameter, never as part of the SQL.

use std::borrow::Cow;
use std::collections::HashMap;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::DbError;

/// A named, literal read statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    /// Label used in logs and metrics
    pub name: &'static str,
    pub sql: &'static str,
}

impl Statement {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self { name, sql }
    }
}

/// A single bind parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Sent as a text-typed NULL; cast in SQL when another type is needed
    Null,
    Bool(bool),
    /// Bound as `int4`; Postgres will not narrow an `int8` argument implicitly
    Int4(i32),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(v)
    }
}

impl From<i32> for BindValue {
    fn from(v: i32) -> Self {
        BindValue::Int4(v)
    }
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Int(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(BindValue::Null)
    }
}

/// Bind parameters for a statement.
///
/// `Positional` values fill `$1`, `$2`, ... in order. `Named` values fill
/// `:name` placeholders, which are rewritten to ordinals before execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    Positional(Vec<BindValue>),
    Named(Vec<(String, BindValue)>),
}

impl Params {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<BindValue>,
    {
        Params::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resolve the final SQL text and the ordered bind values.
    pub fn prepare(&self, sql: &'static str) -> Result<(Cow<'static, str>, Vec<BindValue>), DbError> {
        match self {
            Params::None => Ok((Cow::Borrowed(sql), Vec::new())),
            Params::Positional(values) => Ok((Cow::Borrowed(sql), values.clone())),
            Params::Named(values) => {
                let (rewritten, binds) = rewrite_named(sql, values)?;
                Ok((Cow::Owned(rewritten), binds))
            }
        }
    }
}

/// Rewrite `:name` placeholders to `$n`.
///
/// Quoted text, dollar-quoted bodies, comments, `::` casts and array slice
/// bounds that follow `[` or a digit are left alone. A slice written as
/// `arr[lo:hi]` with an identifier before the colon binds `:hi`.
fn rewrite_named(
    sql: &str,
    values: &[(String, BindValue)],
) -> Result<(String, Vec<BindValue>), DbError> {
    let lookup: HashMap<&str, &BindValue> =
        values.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let mut ordinals: HashMap<String, usize> = HashMap::new();
    let mut binds = Vec::new();
    let mut out = String::with_capacity(sql.len());

    let chars: Vec<char> = sql.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                // Copy through the closing quote; doubled quotes re-enter the loop
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    i += 1;
                    if chars[i - 1] == c {
                        break;
                    }
                }
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                out.push_str("/*");
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        out.push_str("*/");
                        i += 2;
                        break;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
            }
            '$' if !out.ends_with(|p: char| p.is_ascii_alphanumeric() || p == '_') => {
                match dollar_quote_tag(&chars, i) {
                    Some(tag) => {
                        // Copy the whole `$tag$ ... $tag$` body verbatim
                        let body_start = i + tag.len();
                        let close = find_sequence(&chars, body_start, &tag)
                            .map_or(chars.len(), |pos| pos + tag.len());
                        out.extend(&chars[i..close]);
                        i = close;
                    }
                    None => {
                        out.push(c);
                        i += 1;
                    }
                }
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                out.push_str("::");
                i += 2;
            }
            // Array slice bound, as in `arr[1:n]` or `arr[:n]`
            ':' if out
                .trim_end()
                .ends_with(|p: char| p == '[' || p.is_ascii_digit()) =>
            {
                out.push(c);
                i += 1;
            }
            ':' if chars
                .get(i + 1)
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
            {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                let ordinal = match ordinals.get(&name) {
                    Some(n) => *n,
                    None => {
                        let value = lookup.get(name.as_str()).ok_or_else(|| {
                            DbError::Query(format!("no value bound for :{}", name))
                        })?;
                        binds.push((*value).clone());
                        ordinals.insert(name, binds.len());
                        binds.len()
                    }
                };
                out.push('$');
                out.push_str(&ordinal.to_string());
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok((out, binds))
}

/// Opening `$tag$` delimiter at `start`, if any. `$1` style ordinals are not tags.
fn dollar_quote_tag(chars: &[char], start: usize) -> Option<Vec<char>> {
    let mut end = start + 1;
    while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
        if end == start + 1 && chars[end].is_ascii_digit() {
            return None;
        }
        end += 1;
    }
    (chars.get(end) == Some(&'$')).then(|| chars[start..=end].to_vec())
}

fn find_sequence(chars: &[char], from: usize, needle: &[char]) -> Option<usize> {
    if from > chars.len() {
        return None;
    }
    chars[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| from + pos)
}

/// Attach bind values to a typed query in ordinal order.
pub(crate) fn bind_all<'q, T>(
    mut query: QueryAs<'q, Postgres, T, PgArguments>,
    binds: Vec<BindValue>,
) -> QueryAs<'q, Postgres, T, PgArguments>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    for value in binds {
        query = match value {
            BindValue::Null => query.bind(None::<String>),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Int4(v) => query.bind(v),
            BindValue::Int(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::Text(v) => query.bind(v),
        };
    }
    query
}
