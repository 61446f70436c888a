//! Query backends.
//!
//! `<query>` nodes hand their interpolated text and parameters to a
//! [`QueryBackend`]. The interpreter blocks on the call; backends that talk to
//! a real database live outside this crate.

use std::fmt;

use rustc_hash::FxHashMap;
use weft_ir::QuerySource;

use crate::Value;

/// One query, ready to run.
#[derive(Clone, Copy, Debug)]
pub struct QueryRequest<'a> {
    pub name: &'a str,
    pub datasource: Option<&'a str>,
    pub source: QuerySource,
    /// Query text after databinding.
    pub sql: &'a str,
    /// Parameter values in declaration order.
    pub params: &'a [(String, Value)],
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct QueryError(pub String);

pub trait QueryBackend: Send + Sync {
    fn run(&self, request: &QueryRequest<'_>) -> Result<Value, QueryError>;
}

/// Canned results keyed by query name.
///
/// Every request is recorded, so tests can assert on the text and
/// parameters a document produced.
#[derive(Default)]
pub struct MemoryBackend {
    results: FxHashMap<String, Value>,
    log: parking_lot::Mutex<Vec<RecordedQuery>>,
}

/// A request as [`MemoryBackend`] saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedQuery {
    pub name: String,
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_result(mut self, name: impl Into<String>, value: Value) -> Self {
        self.results.insert(name.into(), value);
        self
    }

    pub fn recorded(&self) -> Vec<RecordedQuery> {
        self.log.lock().clone()
    }
}

impl QueryBackend for MemoryBackend {
    fn run(&self, request: &QueryRequest<'_>) -> Result<Value, QueryError> {
        self.log.lock().push(RecordedQuery {
            name: request.name.to_string(),
            sql: request.sql.to_string(),
            params: request.params.to_vec(),
        });
        self.results
            .get(request.name)
            .cloned()
            .ok_or_else(|| QueryError(format!("no result registered for `{}`", request.name)))
    }
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}
