//! Wire format of the fuzzy core
//!
//! Messages are newline-delimited JSON objects:
//! requests `{"id": 1, "method": "...", "params": {...}}`, responses
//! `{"id": 1, "result": ...}` or `{"id": 1, "error": {"code": .., "message": ..}}`.
//! Objects without an `id` are notifications and carry no answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RpcError;

/// One ranked path as sent by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMatch {
    pub result_name: String,
    pub score: i64,
    /// Absent means "no highlight positions"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_indices: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzyQueryParams<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Any message read from the core
#[derive(Debug, Clone, Deserialize)]
pub struct RpcIncoming {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcIncoming {
    /// Outcome of a response message
    pub fn into_outcome(self) -> Result<Value, RpcError> {
        match (self.result, self.error) {
            (_, Some(err)) => Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

/// Parse the `result` of a fuzzy query
///
/// Elements that do not look like a match are skipped, the rest of the list
/// is kept in the order the core sent it.
pub fn parse_matches(result: Value) -> Result<Vec<WireMatch>, RpcError> {
    let items = match result {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(RpcError::Malformed(format!(
                "expected an array of matches, got {}",
                other
            )));
        }
    };

    let mut matches = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<WireMatch>(item) {
            Ok(m) => matches.push(m),
            Err(e) => log::debug!("Skipping malformed fuzzy match: {}", e),
        }
    }
    Ok(matches)
}
