//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("column '{column}' has unsupported type {type_name}")]
    UnsupportedColumnType {
        column: String,
        type_name: String,
    },

    #[error("parameter ${position} ({type_name}): {reason}")]
    InvalidParameter {
        position: usize,
        type_name: String,
        reason: String,
    },

    #[error("parameter ${position} has unsupported type {type_name}")]
    UnsupportedParameterType { position: usize, type_name: String },

    #[error("statement takes {expected} parameters but {actual} were given")]
    ParameterCount { expected: usize, actual: usize },
}
