//! Request handlers for the session, schema, and data services.

pub mod data;
pub mod health;
pub mod schema;
pub mod session;

use crate::context::AuthContext;
use crate::error::ApiError;
use crate::Sessions;
use actix_web::{HttpMessage, HttpRequest};
use kassie_db::CqlSession;
use std::sync::Arc;

/// Resolve the caller's session from the context the auth middleware
/// attached. A session that expired between the middleware check and the
/// handler surfaces as `Unauthenticated`, same as a stale token.
pub(crate) fn current_session(
    req: &HttpRequest,
    sessions: &Sessions,
) -> Result<Arc<kassie_session::Session<CqlSession>>, ApiError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthenticated("no session in context".to_string()))?;

    sessions
        .get(&ctx.session_id)
        .map_err(|_| ApiError::Unauthenticated("session not found or expired".to_string()))
}
