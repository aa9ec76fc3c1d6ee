use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{Result, SqlHttpError};
use crate::protocol::QueryResponse;
use crate::traits::QueryTransport;
use crate::transports::HttpTransport;
use crate::types::SqlValue;

/// Request timeout applied when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A connection to a remote SQL-over-HTTP query endpoint.
///
/// Owns the transport handle and performs exactly one blocking round trip
/// per executed query. Closing is permanent: a closed connection cannot be
/// reopened, and every further operation fails with an interface error.
/// The endpoint is read-only, so `commit` and `rollback` are no-ops — they
/// still enforce the closed-connection check.
///
/// A connection may not be shared across threads; open one connection per
/// thread instead.
pub struct Connection {
    transport: RefCell<Option<Arc<dyn QueryTransport>>>,
    closed: Cell<bool>,
}

impl Connection {
    /// Connect to the endpoint at `base_url` with the default timeout.
    ///
    /// # Example
    /// ```ignore
    /// let conn = Connection::connect("http://localhost:8080")?;
    /// ```
    pub fn connect(base_url: &str) -> Result<Self> {
        Self::connect_with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Connect with an explicit request timeout.
    pub fn connect_with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a connection with a custom transport.
    /// Useful for testing or alternative wire implementations.
    pub fn with_transport(transport: Arc<dyn QueryTransport>) -> Self {
        Self {
            transport: RefCell::new(Some(transport)),
            closed: Cell::new(false),
        }
    }

    /// Liveness guard run at the start of every public operation.
    fn guard_open(&self) -> Result<()> {
        if self.closed.get() {
            return Err(SqlHttpError::Interface("connection is closed".to_string()));
        }
        Ok(())
    }

    /// Execute a query and return the decoded raw response.
    ///
    /// The remote protocol has no placeholder syntax, so a non-empty
    /// parameter set is rejected outright rather than attempted.
    pub fn execute_query(&self, query: &str, params: &[SqlValue]) -> Result<QueryResponse> {
        self.guard_open()?;
        if !params.is_empty() {
            return Err(SqlHttpError::NotSupported(
                "parameterized queries are not supported".to_string(),
            ));
        }

        let transport = self
            .transport
            .borrow()
            .clone()
            .ok_or_else(|| SqlHttpError::Interface("connection is closed".to_string()))?;

        debug!(query_len = query.len(), "executing query");
        transport.run_query(query)
    }

    /// Create a new cursor bound to this connection.
    pub fn cursor(&self) -> Result<Cursor<'_>> {
        self.guard_open()?;
        Ok(Cursor::new(self))
    }

    /// Open a cursor, execute `query` on it, and return it ready to fetch.
    pub fn execute(&self, query: &str) -> Result<Cursor<'_>> {
        let mut cursor = self.cursor()?;
        cursor.execute(query)?;
        Ok(cursor)
    }

    /// Commit the current transaction. The endpoint is read-only, so there
    /// is never anything pending.
    pub fn commit(&self) -> Result<()> {
        self.guard_open()
    }

    /// Roll back the current transaction. The endpoint is read-only, so
    /// there is never anything pending.
    pub fn rollback(&self) -> Result<()> {
        self.guard_open()
    }

    /// Close the connection, releasing the transport handle.
    /// Idempotent: subsequent calls are no-ops.
    pub fn close(&self) {
        if !self.closed.get() {
            debug!("closing connection");
            self.transport.borrow_mut().take();
        }
        self.closed.set(true);
    }

    /// Returns true once the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
