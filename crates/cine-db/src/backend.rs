//! Driver boundary: parameterized statements in, affected counts and rows out

use crate::{DbError, DbResult};
use std::borrow::Cow;

// -2^63 and 2^63: the i64 range as an f64 half-open interval
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_END_F64: f64 = 9_223_372_036_854_775_808.0;

/// A single bound parameter or column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Integers, and reals with no fractional part that fit in an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            SqlValue::Real(v) if v.fract() == 0.0 && (I64_MIN_F64..I64_END_F64).contains(v) => {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Real(v) => Some(*v),
            SqlValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// SQL text plus positional parameters (`?1`, `?2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: Cow<'static, str>,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// One result row, columns in SELECT order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub Vec<SqlValue>);

impl Row {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn column(&self, idx: usize) -> DbResult<&SqlValue> {
        self.0.get(idx).ok_or_else(|| {
            DbError::RowDecode(format!(
                "column {} out of range ({} columns)",
                idx,
                self.len()
            ))
        })
    }

    pub fn get_i64(&self, idx: usize) -> DbResult<i64> {
        let value = self.column(idx)?;
        value
            .as_i64()
            .ok_or_else(|| mismatch(idx, "an integer", value))
    }

    /// Like [`Row::get_i64`], with SQL NULL as `None`
    pub fn get_opt_i64(&self, idx: usize) -> DbResult<Option<i64>> {
        let value = self.column(idx)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_i64()
            .map(Some)
            .ok_or_else(|| mismatch(idx, "an integer", value))
    }

    pub fn get_f64(&self, idx: usize) -> DbResult<f64> {
        let value = self.column(idx)?;
        value
            .as_f64()
            .ok_or_else(|| mismatch(idx, "numeric", value))
    }

    pub fn get_str(&self, idx: usize) -> DbResult<&str> {
        let value = self.column(idx)?;
        value.as_str().ok_or_else(|| mismatch(idx, "text", value))
    }
}

fn mismatch(idx: usize, expected: &str, value: &SqlValue) -> DbError {
    DbError::RowDecode(format!("column {} is not {}: {:?}", idx, expected, value))
}

/// Anything that can run parameterized statements against the schema
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Run one statement, returning the number of rows it changed
    async fn execute(&self, stmt: &Statement) -> DbResult<u64>;

    /// Run one query and collect every row
    async fn fetch_all(&self, stmt: &Statement) -> DbResult<Vec<Row>>;

    /// Run all statements in one transaction; nothing persists unless all succeed
    async fn execute_atomic(&self, stmts: &[Statement]) -> DbResult<u64>;

    /// First row of a query, if any
    async fn fetch_optional(&self, stmt: &Statement) -> DbResult<Option<Row>> {
        Ok(self.fetch_all(stmt).await?.into_iter().next())
    }
}
