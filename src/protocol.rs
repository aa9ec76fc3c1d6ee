use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One raw result record: a mapping from column name to JSON value.
/// Different records in one response may carry different key sets.
pub type Record = serde_json::Map<String, JsonValue>;

/// Request body for the query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Decoded success body from the query endpoint.
///
/// A 2xx body without a `rows` key (e.g. an acknowledgement for a
/// write-style statement) decodes to `rows: None` and materializes as an
/// empty result.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub rows: Option<Vec<Record>>,
}

impl QueryResponse {
    /// Response carrying the given records.
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self { rows: Some(rows) }
    }

    /// Response with no result set at all (no `rows` key on the wire).
    pub fn empty() -> Self {
        Self { rows: None }
    }
}
