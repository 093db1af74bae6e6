//! `PgExecutor` — runs statements on a Postgres pool.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgColumn, PgRow};
use sqlx::{Column, Executor as _, Row as _, Statement as _};
use tracing::{debug, instrument};

use executor::{CallConfig, FieldDescriptor, QueryExecutor, QueryResult, Row};

use crate::columns::decode_column;
use crate::params::bind_param;
use crate::{DbError, DbPool};

/// Executor option toggling prepared-statement caching.
pub const PERSISTENT_OPTION: &str = "persistent";

/// [`QueryExecutor`] backed by a shared [`DbPool`].
///
/// Each statement is prepared before it runs; the parameter types Postgres
/// reports decide how every input is converted and bound.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: DbPool,
}

impl PgExecutor {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    type Error = DbError;

    #[instrument(skip(self, config, values), fields(function = %config.function, params = values.len()))]
    async fn query(
        &self,
        config: &CallConfig,
        values: &[Value],
    ) -> Result<QueryResult, DbError> {
        let statement = (&self.pool).prepare(config.text()).await?;
        let types = statement
            .parameters()
            .and_then(|params| params.left())
            .unwrap_or_default();
        if types.len() != values.len() {
            return Err(DbError::ParameterCount {
                expected: types.len(),
                actual: values.len(),
            });
        }

        let mut query = sqlx::query(config.text());
        for (index, (value, ty)) in values.iter().zip(types).enumerate() {
            query = query.bind(bind_param(value, ty, index + 1)?);
        }

        for (key, value) in &config.options {
            match (key.as_str(), value.as_bool()) {
                (PERSISTENT_OPTION, Some(persistent)) => query = query.persistent(persistent),
                _ => debug!(option = %key, "ignoring executor option"),
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "query returned");
        result_from_rows(statement.columns(), &rows)
    }
}

/// Convert fetched rows into a [`QueryResult`].
///
/// Field order is the statement's column order, known even when no rows come
/// back.
fn result_from_rows(columns: &[PgColumn], rows: &[PgRow]) -> Result<QueryResult, DbError> {
    let fields = columns
        .iter()
        .map(|c| FieldDescriptor::new(c.name()))
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            let mut mapped = Row::new();
            for (index, column) in row.columns().iter().enumerate() {
                mapped.insert(column.name().to_owned(), decode_column(row, index)?);
            }
            Ok::<_, DbError>(mapped)
        })
        .collect::<Result<Vec<_>, DbError>>()?;

    Ok(QueryResult::new(fields, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_columns_and_no_rows_is_an_empty_result() {
        let result = result_from_rows(&[], &[]).unwrap();
        assert!(result.fields.is_empty());
        assert!(result.rows.is_empty());
    }
}
