//! Ordered output values of a stored-function call.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Output values in the executor's declared field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FunctionOutputs(Vec<Value>);

impl FunctionOutputs {
    /// Wrap values already in output order.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Number of outputs, one per result field.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Output at zero-based `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// Deserialise the positional outputs into `T`, typically a tuple.
    ///
    /// `(String, i64, bool)` matches three outputs of those types; the
    /// arity must match exactly.
    pub fn decode<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Array(self.0))
    }
}

impl From<FunctionOutputs> for Vec<Value> {
    fn from(outputs: FunctionOutputs) -> Self {
        outputs.0
    }
}

impl IntoIterator for FunctionOutputs {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
