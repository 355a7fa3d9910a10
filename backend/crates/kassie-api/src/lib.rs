//! HTTP/JSON service surface for the Kassie server.
//!
//! Three services (session, schema, data) registered behind the auth
//! middleware. Handlers resolve the caller's session from the request
//! context the middleware attached and operate through the session's shared
//! driver handle and its cursor registry.

pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

use kassie_db::CqlSession;

/// The pool as instantiated by the server: one driver handle per profile.
pub type DbPool = kassie_db::Pool<CqlSession>;

/// The session registry as instantiated by the server.
pub type Sessions = kassie_session::SessionStore<CqlSession>;

pub use context::AuthContext;
pub use error::ApiError;
pub use middleware::auth::AuthMiddleware;
