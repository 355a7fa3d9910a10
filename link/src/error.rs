// Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KassieLinkError {
    /// Transport-level failure (connect, timeout, invalid URL)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server said 401. The message distinguishes an expired token from a
    /// dead session; the client auto-refreshes only on the former.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Server rejected the request body (400)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown profile, table, or cursor (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Cluster unreachable behind the server (503)
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Any other server-side failure
    #[error("server error: {0}")]
    Server(String),

    /// An authenticated call was made before login
    #[error("not logged in")]
    NotLoggedIn,

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, KassieLinkError>;
