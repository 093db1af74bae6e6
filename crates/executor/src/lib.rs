//! `executor` crate — the `QueryExecutor` trait and the shapes it exchanges.
//!
//! Anything able to run a SQL statement with positional parameters and hand
//! back rows plus field metadata implements [`QueryExecutor`]. The `caller`
//! crate builds stored-function calls on top of this trait; the `db` crate
//! provides the Postgres implementation.

pub mod error;
pub mod models;
pub mod traits;
pub mod mock;

pub use error::MockError;
pub use models::{CallConfig, FieldDescriptor, QueryResult, Row};
pub use traits::QueryExecutor;
