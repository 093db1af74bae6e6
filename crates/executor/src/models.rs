//! Request and result shapes exchanged with a [`QueryExecutor`](crate::QueryExecutor).
//!
//! Values are carried as `serde_json::Value` so executors stay free to map
//! them onto whatever their driver binds natively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// CallConfig
// ---------------------------------------------------------------------------

/// Configuration handed to the executor for a single statement.
///
/// Serialises flat: `{"function": "foo", "text": "...", "binary": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    /// Name of the stored function being invoked.
    pub function: String,
    /// SQL the executor runs. Overwritten on every call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Executor-specific options, passed through untouched.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl CallConfig {
    /// Config for `function` with no options and no text yet.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            text: None,
            options: Map::new(),
        }
    }

    /// Builder-style helper to attach an executor option.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Pass-through option `key`, if set.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The SQL to run, or `""` when none has been built yet.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// QueryResult
// ---------------------------------------------------------------------------

/// Metadata naming one output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Rows plus the field order the executor declared for them.
///
/// `fields` is authoritative for column order; the key order of each
/// [`Row`] carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub fields: Vec<FieldDescriptor>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(fields: Vec<FieldDescriptor>, rows: Vec<Row>) -> Self {
        Self { fields, rows }
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }
}
