//! Caller-level error types.

use thiserror::Error;

/// Errors produced while calling a stored function.
///
/// `E` is the executor's own error type; it is forwarded untouched.
#[derive(Debug, Error)]
pub enum CallError<E>
where
    E: std::error::Error + 'static,
{
    /// The executor failed; the value is exactly what it reported.
    #[error(transparent)]
    Executor(E),

    /// The executor succeeded but returned no row to unpack.
    #[error("function '{function}' returned no row")]
    NoRow { function: String },
}

impl<E> CallError<E>
where
    E: std::error::Error + 'static,
{
    /// The executor's error, if this is one.
    pub fn executor_error(&self) -> Option<&E> {
        match self {
            Self::Executor(e) => Some(e),
            Self::NoRow { .. } => None,
        }
    }

    pub fn into_executor_error(self) -> Option<E> {
        match self {
            Self::Executor(e) => Some(e),
            Self::NoRow { .. } => None,
        }
    }
}
