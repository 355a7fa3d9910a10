// Registry error types

use thiserror::Error;

/// Errors raised by the session and cursor registries.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("session not found")]
    SessionNotFound,

    #[error("session expired")]
    SessionExpired,

    #[error("cursor not found")]
    CursorNotFound,

    #[error("cursor expired")]
    CursorExpired,
}

pub type StateResult<T> = Result<T, StateError>;
