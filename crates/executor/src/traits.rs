//! The `QueryExecutor` trait — the contract every executor must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::{CallConfig, QueryResult};

/// Runs one SQL statement and reports its rows and field metadata.
///
/// The statement to run is `config.text`; every other option on the config
/// is executor-specific and may be ignored.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Error reported when the statement fails. Callers forward it as-is.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute `config.text` with `values` bound to `$1..$N`.
    async fn query(
        &self,
        config: &CallConfig,
        values: &[Value],
    ) -> Result<QueryResult, Self::Error>;
}
