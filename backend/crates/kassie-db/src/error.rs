// Driver-layer error types

use thiserror::Error;

/// Errors raised by the connection pool and query layer.
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection config lists no hosts
    #[error("no hosts configured")]
    NoHosts,

    /// Connection config port outside [1, 65535]
    #[error("invalid port number")]
    InvalidPort,

    /// The driver failed to establish a cluster session
    #[error("failed to connect to cluster: {0}")]
    ConnectionFailed(String),

    /// The pool was shut down; no further handles are served
    #[error("connection pool is closed")]
    PoolClosed,

    /// No pooled handle under this profile name
    #[error("connection not found for profile: {0}")]
    NotFound(String),

    /// The pooled handle was marked closed
    #[error("connection closed for profile: {0}")]
    HandleClosed(String),

    /// A driver call exceeded the request timeout
    #[error("query timed out")]
    Timeout,

    /// The driver reported a query failure
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A result row could not be decoded into the expected shape
    #[error("failed to decode row: {0}")]
    Decode(String),
}

pub type DbResult<T> = Result<T, DbError>;
