//! sqlhttp - a blocking client for SQL-over-HTTP query endpoints
//!
//! Exposes a remote `POST /query` endpoint through the conventional
//! connection / cursor / fetch protocol, so generic tooling built against
//! that protocol (table formatters, frame conversion, CLI query runners)
//! works unchanged.
//!
//! # Example
//! ```ignore
//! use sqlhttp::Connection;
//!
//! let conn = Connection::connect("http://localhost:8080")?;
//! let mut cursor = conn.cursor()?;
//! cursor.execute("SELECT name, status FROM services")?;
//!
//! for row in cursor.rows() {
//!     let row = row?;
//!     println!("{:?}", row.values());
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod render;
pub mod traits;
pub mod transports;
pub mod types;

mod connection;
mod cursor;

// Re-export main types for convenient access
pub use connection::{Connection, DEFAULT_TIMEOUT};
pub use cursor::{Cursor, Rows};
pub use error::{Result, SqlHttpError, Warning};
pub use traits::QueryTransport;
pub use types::{ColumnDesc, DataFrame, Row, SqlValue};

/// Client protocol level implemented by this crate.
pub const API_LEVEL: &str = "2.0";

/// Thread-safety level: the crate may be shared across threads; a single
/// connection or cursor may not.
pub const THREAD_SAFETY: u8 = 1;

/// Declared parameter style. Parameters are rejected in practice: the
/// remote protocol has no placeholder syntax.
pub const PARAM_STYLE: &str = "named";
