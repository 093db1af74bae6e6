//! Stored-function caller.
//!
//! `FunctionCaller` is the whole call path:
//! 1. Normalises the request into a `CallConfig`.
//! 2. Builds `SELECT*FROM name($1,...,$N)` into `config.text`.
//! 3. Runs it once on the bound executor.
//! 4. Unpacks the first row in the executor's field order.
//!
//! [`CallFunction`] is blanket-implemented for every `QueryExecutor`, so any
//! executor can be used as `executor.call_function(...)` directly.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use executor::{CallConfig, QueryExecutor, QueryResult};

use crate::request::build_query_text;
use crate::{CallError, CallRequest, FunctionOutputs};

// ---------------------------------------------------------------------------
// FunctionCaller
// ---------------------------------------------------------------------------

/// Calls stored functions through a borrowed executor.
pub struct FunctionCaller<'a, X: ?Sized> {
    executor: &'a X,
}

impl<'a, X> FunctionCaller<'a, X>
where
    X: QueryExecutor + ?Sized,
{
    /// Bind a caller to `executor`.
    pub fn new(executor: &'a X) -> Self {
        Self { executor }
    }

    /// Call the function named by `request` with `inputs` bound to `$1..$N`.
    ///
    /// # Errors
    /// Returns the executor's error unchanged as [`CallError::Executor`], or
    /// [`CallError::NoRow`] when the query yields no rows.
    pub async fn call(
        &self,
        request: impl Into<CallRequest>,
        inputs: &[Value],
    ) -> Result<FunctionOutputs, CallError<X::Error>> {
        self.call_config(request.into().into_config(), inputs).await
    }

    /// Same as [`FunctionCaller::call`] for an already normalised config.
    ///
    /// Any `text` already on the config is overwritten; every other option
    /// reaches the executor untouched.
    #[instrument(skip(self, config, inputs), fields(function = %config.function, inputs = inputs.len()))]
    pub async fn call_config(
        &self,
        mut config: CallConfig,
        inputs: &[Value],
    ) -> Result<FunctionOutputs, CallError<X::Error>> {
        config.text = Some(build_query_text(&config.function, inputs.len()));
        debug!(text = config.text(), "calling stored function");

        let result = self
            .executor
            .query(&config, inputs)
            .await
            .map_err(CallError::Executor)?;

        unpack_first_row(&config.function, &result)
    }
}

/// Collect the first row's values in `result.fields` order.
///
/// A field missing from the row yields `null`.
fn unpack_first_row<E>(function: &str, result: &QueryResult) -> Result<FunctionOutputs, CallError<E>>
where
    E: std::error::Error + 'static,
{
    let row = result.first_row().ok_or_else(|| CallError::NoRow {
        function: function.to_owned(),
    })?;

    let values = result
        .fields
        .iter()
        .map(|field| match row.get(&field.name) {
            Some(value) => value.clone(),
            None => {
                warn!(field = %field.name, "declared field missing from row");
                Value::Null
            }
        })
        .collect();

    Ok(FunctionOutputs::new(values))
}

// ---------------------------------------------------------------------------
// Extension trait
// ---------------------------------------------------------------------------

/// Adds `call_function` to every [`QueryExecutor`].
#[async_trait]
pub trait CallFunction: QueryExecutor {
    /// See [`FunctionCaller::call`].
    async fn call_function<R>(
        &self,
        request: R,
        inputs: &[Value],
    ) -> Result<FunctionOutputs, CallError<Self::Error>>
    where
        R: Into<CallRequest> + Send;
}

#[async_trait]
impl<T> CallFunction for T
where
    T: QueryExecutor + ?Sized,
{
    async fn call_function<R>(
        &self,
        request: R,
        inputs: &[Value],
    ) -> Result<FunctionOutputs, CallError<Self::Error>>
    where
        R: Into<CallRequest> + Send,
    {
        FunctionCaller::new(self).call(request, inputs).await
    }
}
