//! `MockExecutor` — a test double for `QueryExecutor`.
//!
//! Useful in unit and integration tests where a real database is either
//! unavailable or irrelevant.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::{CallConfig, MockError, QueryExecutor, QueryResult};

/// Behaviour injected into `MockExecutor` at construction time.
pub enum MockBehaviour {
    /// Return a specific result.
    Return(QueryResult),
    /// Fail with the given message.
    Fail(String),
}

/// One `query` invocation as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub config: CallConfig,
    pub values: Vec<Value>,
}

/// A mock executor that records every query it receives and returns a
/// programmer-specified result.
pub struct MockExecutor {
    /// What the executor will do when `query` is called.
    pub behaviour: MockBehaviour,
    /// All queries seen by this executor (in call order).
    pub calls: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MockExecutor {
    /// Create a mock that always succeeds with the given result.
    pub fn returning(result: QueryResult) -> Self {
        Self {
            behaviour: MockBehaviour::Return(result),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails with `msg`.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `query` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The first recorded query, if any.
    pub fn first_call(&self) -> Option<RecordedQuery> {
        self.calls.lock().unwrap().first().cloned()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    type Error = MockError;

    async fn query(
        &self,
        config: &CallConfig,
        values: &[Value],
    ) -> Result<QueryResult, MockError> {
        self.calls.lock().unwrap().push(RecordedQuery {
            config: config.clone(),
            values: values.to_vec(),
        });

        match &self.behaviour {
            MockBehaviour::Return(result) => Ok(result.clone()),
            MockBehaviour::Fail(msg) => Err(MockError(msg.clone())),
        }
    }
}
