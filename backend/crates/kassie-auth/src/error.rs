// Token service error types

use thiserror::Error;

/// Errors raised while minting or validating bearer tokens.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Signature, parse, or algorithm failure
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry claim
    #[error("token expired")]
    TokenExpired,

    /// Claims decoded but do not match what the caller expected
    /// (typically an access token offered where a refresh token is
    /// required, or vice versa)
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Claims carry no session id
    #[error("missing session id")]
    MissingSessionId,

    /// Claims carry no profile name
    #[error("missing profile")]
    MissingProfile,

    /// The service was constructed with an empty signing secret
    #[error("invalid secret key")]
    InvalidSecret,

    /// The JWT library failed to sign
    #[error("failed to sign token: {0}")]
    SigningFailed(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
