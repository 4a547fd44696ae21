//! Database access layer for the movie-industry schema
//!
//! [`Repository`] exposes the entity, relationship and analytics
//! operations over any [`Backend`]. [`DbClient`] is the sqlx/SQLite
//! backend used in production; tests may inject their own.

pub mod analytics;
pub mod backend;
pub mod client;
pub mod entities;
pub mod relations;
pub mod repository;
pub mod schema;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::*;
pub use client::*;
pub use repository::Repository;

use cine_core::ReturnCode;
use std::fmt;
use thiserror::Error;

/// Kind of integrity constraint the database rejected a statement for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    NotNull,
    Check,
    Unique,
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation ({kind}): {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Unexpected row shape: {0}")]
    RowDecode(String),
}

impl DbError {
    pub fn constraint(kind: ConstraintKind, message: impl Into<String>) -> Self {
        DbError::ConstraintViolation {
            kind,
            message: message.into(),
        }
    }

    /// Result code a mutating operation reports for this error
    pub fn return_code(&self) -> ReturnCode {
        match self {
            DbError::ConstraintViolation { kind, .. } => match kind {
                ConstraintKind::NotNull | ConstraintKind::Check => ReturnCode::BadParameters,
                ConstraintKind::Unique => ReturnCode::AlreadyExists,
                ConstraintKind::ForeignKey => ReturnCode::NotExists,
            },
            DbError::NotFound => ReturnCode::NotExists,
            DbError::ConnectionError(_)
            | DbError::ConfigError(_)
            | DbError::QueryError(_)
            | DbError::RowDecode(_) => ReturnCode::Error,
        }
    }

    /// Whether the error is a rejected row rather than a broken database
    pub fn is_constraint(&self) -> bool {
        matches!(self, DbError::ConstraintViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                let kind = match db_err.kind() {
                    ErrorKind::NotNullViolation => ConstraintKind::NotNull,
                    ErrorKind::CheckViolation => ConstraintKind::Check,
                    ErrorKind::UniqueViolation => ConstraintKind::Unique,
                    ErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
                    _ => return DbError::QueryError(message),
                };
                DbError::constraint(kind, message)
            }
            conn_err @ (sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed) => DbError::ConnectionError(conn_err),
            sqlx::Error::RowNotFound => DbError::NotFound,
            other => DbError::QueryError(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
