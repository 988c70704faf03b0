//! Persisted snapshot format: a JSON array of `{id, text, completed}`
//! records in collection order.

use serde::Deserialize;
use serde_json::Value;

use crate::io::store::StoreError;
use crate::model::task::Task;

/// Encode tasks as a compact JSON array
pub fn encode(tasks: &[Task]) -> Result<String, StoreError> {
    serde_json::to_string(tasks).map_err(StoreError::Encode)
}

/// Decode a JSON array of task records
pub fn decode(text: &str) -> Result<Vec<Task>, StoreError> {
    serde_json::from_str(text).map_err(StoreError::Decode)
}

pub fn to_value(tasks: &[Task]) -> Result<Value, StoreError> {
    serde_json::to_value(tasks).map_err(StoreError::Encode)
}

/// Decode a snapshot held as a JSON value. A string value is treated as an
/// encoded snapshot, the shape browser local storage exports use.
pub fn from_value(value: &Value) -> Result<Vec<Task>, StoreError> {
    match value {
        Value::String(text) => decode(text),
        Value::Null => Ok(Vec::new()),
        other => Vec::<Task>::deserialize(other).map_err(StoreError::Decode),
    }
}
