//! Call requests and the SQL text built from them.

use serde::{Deserialize, Serialize};

use executor::CallConfig;

/// What to call: a bare function name, or a full executor config.
///
/// Deserialises from either a JSON string or a JSON object with a
/// `function` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallRequest {
    ByName(String),
    ByConfig(CallConfig),
}

impl CallRequest {
    /// Name of the function this request invokes.
    pub fn function(&self) -> &str {
        match self {
            Self::ByName(name) => name,
            Self::ByConfig(config) => &config.function,
        }
    }

    /// Normalise into a config; a bare name becomes `{function: name}`.
    pub fn into_config(self) -> CallConfig {
        match self {
            Self::ByName(name) => CallConfig::new(name),
            Self::ByConfig(config) => config,
        }
    }
}

impl From<&str> for CallRequest {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_owned())
    }
}

impl From<String> for CallRequest {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<CallConfig> for CallRequest {
    fn from(config: CallConfig) -> Self {
        Self::ByConfig(config)
    }
}

/// Build `SELECT*FROM <function>($1,...,$count)`.
///
/// Placeholders are 1-based and comma-joined with no whitespace; with
/// `count == 0` the parentheses stay empty.
pub fn build_query_text(function: &str, count: usize) -> String {
    let placeholders = (1..=count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("SELECT*FROM {function}({placeholders})")
}
