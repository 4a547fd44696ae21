//! Scripted backend for unit tests

use crate::backend::{Backend, Row, Statement};
use crate::{DbError, DbResult};
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) enum Reply {
    Affected(u64),
    Rows(Vec<Row>),
    Fail(DbError),
}

/// Answers each call with the next scripted reply and records what it ran
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<Vec<Statement>>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Statements grouped per backend call, in call order
    pub(crate) fn calls(&self) -> Vec<Vec<Statement>> {
        self.seen.lock().unwrap().clone()
    }

    fn next(&self, stmts: &[Statement]) -> Reply {
        self.seen.lock().unwrap().push(stmts.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Fail(DbError::QueryError("out of script".into())))
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        match self.next(std::slice::from_ref(stmt)) {
            Reply::Affected(n) => Ok(n),
            Reply::Rows(rows) => Ok(rows.len() as u64),
            Reply::Fail(err) => Err(err),
        }
    }

    async fn fetch_all(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        match self.next(std::slice::from_ref(stmt)) {
            Reply::Rows(rows) => Ok(rows),
            Reply::Affected(_) => Ok(Vec::new()),
            Reply::Fail(err) => Err(err),
        }
    }

    async fn execute_atomic(&self, stmts: &[Statement]) -> DbResult<u64> {
        match self.next(stmts) {
            Reply::Affected(n) => Ok(n),
            Reply::Rows(_) => Ok(stmts.len() as u64),
            Reply::Fail(err) => Err(err),
        }
    }
}
