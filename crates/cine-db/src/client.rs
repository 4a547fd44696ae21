//! Database client and connection management

use crate::backend::{Backend, Row, SqlValue, Statement};
use crate::{DbError, DbResult};
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row as _, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Database client wrapping sqlx connection pool
#[derive(Clone)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    /// Create a new database client from connection string
    pub async fn new(database_url: &str) -> DbResult<Self> {
        Self::connect(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connect by URL with an explicit pool size; the file is created if missing
    pub async fn connect(database_url: &str, max_connections: u32) -> DbResult<Self> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        Self::with_options(opts, max_connections).await
    }

    /// Create a new database client with custom options
    pub async fn with_options(opts: SqliteConnectOptions, max_connections: u32) -> DbResult<Self> {
        if max_connections == 0 {
            return Err(DbError::ConfigError(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Pinned to a single connection that is never recycled, since every
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> DbResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn bind_params<'q>(stmt: &'q Statement) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    stmt.params
        .iter()
        .fold(sqlx::query(stmt.sql.as_ref()), |query, param| match param {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        })
}

fn decode_row(row: &SqliteRow) -> DbResult<Row> {
    let mut values = Vec::with_capacity(row.len());
    for idx in 0..row.len() {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            values.push(SqlValue::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_string();
        let value = match type_name.as_str() {
            "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get::<i64, _>(idx)?),
            "REAL" | "NUMERIC" => SqlValue::Real(row.try_get::<f64, _>(idx)?),
            "TEXT" => SqlValue::Text(row.try_get::<String, _>(idx)?),
            other => {
                return Err(DbError::RowDecode(format!(
                    "unsupported column type {} at {}",
                    other, idx
                )))
            }
        };
        values.push(value);
    }
    Ok(Row(values))
}

#[async_trait::async_trait]
impl Backend for DbClient {
    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let result = bind_params(stmt).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        let rows = bind_params(stmt).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute_atomic(&self, stmts: &[Statement]) -> DbResult<u64> {
        // Dropping an uncommitted transaction rolls it back
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for stmt in stmts {
            affected += bind_params(stmt).execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        debug!("Committed {} statements ({} rows)", stmts.len(), affected);
        Ok(affected)
    }
}

/// Build SQLite connection options from components
pub struct DbConnectionBuilder {
    filename: PathBuf,
    create_if_missing: bool,
    busy_timeout: Duration,
    max_connections: u32,
}

impl DbConnectionBuilder {
    pub fn new(filename: impl AsRef<Path>) -> Self {
        Self {
            filename: filename.as_ref().to_path_buf(),
            create_if_missing: true,
            busy_timeout: Duration::from_secs(5),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn build(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.filename)
            .create_if_missing(self.create_if_missing)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true)
    }

    /// Open a pooled client with the built options
    pub async fn connect(self) -> DbResult<DbClient> {
        DbClient::with_options(self.build(), self.max_connections)
            .await
    }
}
