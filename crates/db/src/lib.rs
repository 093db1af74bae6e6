//! `db` crate — Postgres implementation of `QueryExecutor`.
//!
//! Provides a connection pool and [`PgExecutor`], which prepares each
//! statement, binds JSON inputs with the parameter types Postgres declared
//! for them and decodes result columns back into JSON.  No call-building
//! logic lives here.

pub mod error;
pub mod pool;
pub mod kind;
pub mod params;
mod columns;
pub mod pg_executor;

pub use pool::{DbPool, PoolConfig};
pub use error::DbError;
pub use pg_executor::PgExecutor;
