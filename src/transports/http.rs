use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::{Result, SqlHttpError};
use crate::protocol::{QueryRequest, QueryResponse};
use crate::traits::QueryTransport;

/// Blocking HTTP transport for the remote query endpoint.
///
/// Issues `POST {base_url}/query` with a JSON body per query. The timeout
/// is fixed at construction and applies to the whole round trip; there is
/// no per-call override and no retry.
#[derive(Debug)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport for the given endpoint base URL.
    ///
    /// Example `base_url`: `http://localhost:8080`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SqlHttpError::Operational(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The endpoint base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl QueryTransport for HttpTransport {
    fn run_query(&self, query: &str) -> Result<QueryResponse> {
        let url = format!("{}/query", self.base_url);
        debug!(url = %url, "dispatching query");

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&QueryRequest::new(query))
            .send()
            .map_err(|e| SqlHttpError::Operational(format!("request failed: {e}")))?;

        // Capture the status code before consuming the response
        let status = resp.status();
        let text_body = resp
            .text()
            .map_err(|e| SqlHttpError::Operational(format!("request failed: {e}")))?;

        if !status.is_success() {
            return Err(SqlHttpError::Operational(format!(
                "query failed: HTTP {}: {}",
                status.as_u16(),
                text_body
            )));
        }

        serde_json::from_str(&text_body)
            .map_err(|e| SqlHttpError::Database(format!("invalid response format: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let transport =
            HttpTransport::new("http://localhost:8080/", Duration::from_secs(30)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_unreachable_endpoint_is_operational() {
        // Nothing listens on a reserved TEST-NET address; the connect fails
        // fast and must surface as an operational error.
        let transport =
            HttpTransport::new("http://192.0.2.1:9", Duration::from_millis(200)).unwrap();
        let err = transport.run_query("SELECT 1").unwrap_err();
        assert!(matches!(err, SqlHttpError::Operational(_)), "{err}");
    }
}
