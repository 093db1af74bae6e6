//! Error type produced by the mock executor.

use thiserror::Error;

/// The error a [`MockExecutor`](crate::mock::MockExecutor) reports.
///
/// Displays as the bare message so tests can compare it against the value
/// they injected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MockError(pub String);
