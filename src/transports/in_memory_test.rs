use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::error::{Result, SqlHttpError};
use crate::protocol::{QueryResponse, Record};
use crate::traits::QueryTransport;

/// An in-memory query transport for testing.
///
/// Allows configuring queued responses (or errors) and verifying the query
/// texts that were dispatched, without any network.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sqlhttp::transports::{InMemoryTransport, ResponseBuilder};
/// use serde_json::json;
///
/// let transport = Arc::new(
///     InMemoryTransport::new().with_response(
///         ResponseBuilder::new()
///             .record(json!({"id": 1, "name": "Alice"}))
///             .build(),
///     ),
/// );
/// ```
pub struct InMemoryTransport {
    responses: Mutex<VecDeque<Result<QueryResponse>>>,
    recorded_queries: Mutex<Vec<String>>,
}

impl InMemoryTransport {
    /// Create a new in-memory transport with no pre-configured responses.
    /// With nothing queued, queries succeed with an empty result set.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            recorded_queries: Mutex::new(Vec::new()),
        }
    }

    /// Add a response to be returned by the next query.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: QueryResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Add an error to be returned by the next query.
    pub fn with_error(self, error: SqlHttpError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Add multiple responses to be returned by subsequent queries.
    pub fn with_responses(self, responses: impl IntoIterator<Item = QueryResponse>) -> Self {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(Ok(response));
        }
        drop(queue);
        self
    }

    /// Get all query texts that have been dispatched.
    pub fn recorded_queries(&self) -> Vec<String> {
        self.recorded_queries.lock().unwrap().clone()
    }

    /// Get the last dispatched query text, if any.
    pub fn last_query(&self) -> Option<String> {
        self.recorded_queries.lock().unwrap().last().cloned()
    }

    /// Assert that the last dispatched query matches the expected text.
    pub fn assert_last_query(&self, expected: &str) {
        let last = self.last_query().expect("No queries were dispatched");
        assert_eq!(
            last, expected,
            "Query mismatch.\nExpected: {}\nActual: {}",
            expected, last
        );
    }

    /// Assert that exactly n queries were dispatched.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = self.recorded_queries.lock().unwrap().len();
        assert_eq!(
            actual, expected,
            "Query count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTransport for InMemoryTransport {
    fn run_query(&self, query: &str) -> Result<QueryResponse> {
        self.recorded_queries.lock().unwrap().push(query.to_string());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResponse::with_rows(Vec::new())))
    }
}

/// Builder for creating test responses easily.
pub struct ResponseBuilder {
    rows: Vec<Record>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a record from a JSON object literal.
    ///
    /// Panics if the value is not a JSON object; test inputs are expected
    /// to come from `serde_json::json!` object literals.
    pub fn record(mut self, value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => self.rows.push(map),
            other => panic!("record must be a JSON object, got: {}", other),
        }
        self
    }

    /// Build a response carrying the accumulated records.
    pub fn build(self) -> QueryResponse {
        QueryResponse::with_rows(self.rows)
    }

    /// Build a response with no `rows` key at all, as a write-style
    /// acknowledgement would look on the wire.
    pub fn build_without_rows(self) -> QueryResponse {
        QueryResponse::empty()
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
