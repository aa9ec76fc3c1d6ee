use crate::error::Result;
use crate::protocol::QueryResponse;

/// Trait for query transport implementations.
/// Transports are responsible for:
/// - Delivering one query text per call to the remote endpoint
/// - Mapping transport and protocol failures into the error taxonomy
/// - Decoding the response body into a `QueryResponse`
pub trait QueryTransport: Send + Sync {
    /// Execute a single query and return the decoded response.
    fn run_query(&self, query: &str) -> Result<QueryResponse>;
}
