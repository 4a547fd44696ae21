//! Repository over an injected backend, and result-code translation

use crate::backend::{Backend, Row};
use crate::client::DbClient;
use crate::{schema, DbError, DbResult};
use cine_core::ReturnCode;
use tracing::{debug, error, instrument, warn};

/// Entity, relationship and analytics operations over a [`Backend`]
///
/// Operations never return driver errors: mutations report a
/// [`ReturnCode`], lookups fall back to sentinel records and analytics
/// to their empty value. Every failure is logged where it is translated.
#[derive(Clone)]
pub struct Repository<B = DbClient> {
    backend: B,
}

impl<B: Backend> Repository<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Create tables and views if absent. Failures are logged only.
    #[instrument(skip(self))]
    pub async fn create_schema(&self) {
        if let Err(e) = schema::create_all(&self.backend).await {
            error!("Schema creation failed: {}", e);
        }
    }

    /// Delete all entity rows. Failures are logged only.
    #[instrument(skip(self))]
    pub async fn clear_data(&self) {
        if let Err(e) = schema::clear_all(&self.backend).await {
            error!("Clearing data failed: {}", e);
        }
    }

    /// Drop every table and view. Failures are logged only.
    #[instrument(skip(self))]
    pub async fn drop_schema(&self) {
        if let Err(e) = schema::drop_all(&self.backend).await {
            error!("Dropping schema failed: {}", e);
        }
    }
}

/// Log a failed operation and pick its result code
pub(crate) fn failure_code(op: &str, err: &DbError) -> ReturnCode {
    let code = err.return_code();
    if err.is_constraint() {
        warn!(op, %code, "Rejected: {}", err);
    } else {
        error!(op, %code, "Failed: {}", err);
    }
    code
}

/// Outcome of an INSERT (or insert batch)
pub(crate) fn insert_outcome(op: &str, result: DbResult<u64>) -> ReturnCode {
    match result {
        Ok(rows) => {
            debug!(op, rows, "Inserted");
            ReturnCode::Ok
        }
        Err(e) => failure_code(op, &e),
    }
}

/// Outcome of a DELETE by key; nothing deleted means the key was absent
pub(crate) fn delete_outcome(op: &str, result: DbResult<u64>) -> ReturnCode {
    match result {
        Ok(0) => {
            debug!(op, "Nothing to delete");
            ReturnCode::NotExists
        }
        Ok(rows) => {
            debug!(op, rows, "Deleted");
            ReturnCode::Ok
        }
        Err(e) => failure_code(op, &e),
    }
}

/// Decode an optional row, or fall back to `sentinel` when absent or broken
pub(crate) fn lookup_or<T>(
    op: &str,
    result: DbResult<Option<Row>>,
    decode: fn(&Row) -> DbResult<T>,
    sentinel: impl FnOnce() -> T,
) -> T {
    match result.and_then(|row| row.as_ref().map(decode).transpose()) {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(op, "No such record");
            sentinel()
        }
        Err(e) => {
            error!(op, "Lookup failed: {}", e);
            sentinel()
        }
    }
}

/// Unwrap an analytics result, logging and substituting `fallback` on failure
pub(crate) fn value_or<T>(op: &str, result: DbResult<T>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        error!(op, "Query failed: {}", e);
        fallback
    })
}
