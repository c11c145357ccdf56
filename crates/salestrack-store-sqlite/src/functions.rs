//! SQL functions registered on every connection.

use std::sync::Arc;

use regex::Regex;
use rusqlite::{Connection, functions::FunctionFlags};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Back the `X REGEXP Y` operator with the `regex` crate. SQLite calls
/// `regexp(Y, X)`; the compiled pattern is cached per statement. NULL text
/// never matches.
pub fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "regexp",
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let pattern: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
        Ok(Regex::new(vr.as_str()?)?)
      })?;
      let text = ctx
        .get_raw(1)
        .as_str_or_null()
        .map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;
      Ok(text.is_some_and(|t| pattern.is_match(t)))
    },
  )
}
