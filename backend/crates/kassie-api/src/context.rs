// Request-scoped identity attached by the auth middleware

/// Identity the auth middleware resolves from a bearer token and attaches to
/// the request extensions for downstream handlers. A typed carrier, so
/// handlers cannot collide with other extension keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub session_id: String,
    pub profile: String,
}
