//! `caller` crate — stored-function calls on top of any `QueryExecutor`.
//!
//! [`FunctionCaller`] turns a function name (or a [`CallConfig`]) plus
//! positional inputs into `SELECT*FROM name($1,...,$N)`, runs it on the
//! executor it is bound to, and unpacks the first row into ordered outputs.
//! The [`CallFunction`] extension trait gives every executor a
//! `call_function` method without touching how the executor is built.

pub mod error;
pub mod request;
pub mod outputs;
pub mod caller;

pub use caller::{CallFunction, FunctionCaller};
pub use error::CallError;
pub use executor::CallConfig;
pub use outputs::FunctionOutputs;
pub use request::{build_query_text, CallRequest};
