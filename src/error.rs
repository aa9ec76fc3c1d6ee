use thiserror::Error;

/// Error type for sqlhttp operations.
///
/// Variants follow the conventional relational-client taxonomy: interface
/// errors are client-side misuse of a closed connection or cursor, while
/// everything else is a database error of a more specific kind. `Clone` is
/// derived so test transports can queue errors for later delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SqlHttpError {
    /// Client-side misuse: operating on a closed connection or cursor.
    #[error("interface error: {0}")]
    Interface(String),

    /// Generic database-side failure, e.g. an undecodable response body.
    #[error("database error: {0}")]
    Database(String),

    /// Transport or HTTP failure: refused connection, timeout, bad status.
    #[error("operational error: {0}")]
    Operational(String),

    /// Problems with processed data. Reserved, unused by this backend.
    #[error("data error: {0}")]
    Data(String),

    /// Constraint violations. Reserved, unused by this backend.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Internal database errors. Reserved, unused by this backend.
    #[error("internal error: {0}")]
    Internal(String),

    /// Caller misuse: fetch before execute, unsupported parameter usage.
    #[error("programming error: {0}")]
    Programming(String),

    /// Operation the remote endpoint cannot perform.
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl SqlHttpError {
    /// True for client-side interface misuse.
    pub fn is_interface_error(&self) -> bool {
        matches!(self, SqlHttpError::Interface(_))
    }

    /// True for every database-error kind, including the specific ones.
    pub fn is_database_error(&self) -> bool {
        matches!(
            self,
            SqlHttpError::Database(_)
                | SqlHttpError::Operational(_)
                | SqlHttpError::Data(_)
                | SqlHttpError::Integrity(_)
                | SqlHttpError::Internal(_)
                | SqlHttpError::Programming(_)
                | SqlHttpError::NotSupported(_)
        )
    }
}

/// Non-fatal notice type. Part of the client protocol surface; this backend
/// never raises one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("warning: {0}")]
pub struct Warning(pub String);

/// Result type alias for sqlhttp operations.
pub type Result<T> = std::result::Result<T, SqlHttpError>;
