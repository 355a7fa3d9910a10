//! Bearer-token authentication middleware.
//!
//! Runs once per inbound request:
//! 1. Public methods (login, refresh, profiles, health) pass through untouched.
//! 2. Everything else must carry `Authorization: Bearer <access token>`.
//! 3. The token is validated as an access token; the session it names must
//!    still resolve in the registry, so token theft alone grants access only
//!    while both hold.
//! 4. On success, `AuthContext` is attached to the request extensions.
//!
//! The middleware is generic over the connection handle type so it can be
//! exercised against a stub session registry.

use crate::context::AuthContext;
use crate::error::ErrorResponse;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use kassie_auth::{AuthError, TokenKind, TokenService};
use kassie_session::SessionStore;
use log::warn;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Request paths exempt from token validation.
pub const PUBLIC_PATHS: &[&str] = &[
    "/v1/api/session/login",
    "/v1/api/session/refresh",
    "/v1/api/session/profiles",
    "/healthz",
];

/// Authentication middleware factory.
pub struct AuthMiddleware<C> {
    tokens: Arc<TokenService>,
    sessions: Arc<SessionStore<C>>,
}

impl<C> AuthMiddleware<C> {
    pub fn new(tokens: Arc<TokenService>, sessions: Arc<SessionStore<C>>) -> Self {
        Self { tokens, sessions }
    }
}

impl<S, C> Transform<S, ServiceRequest> for AuthMiddleware<C>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
    C: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S, C>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S, C> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
    sessions: Arc<SessionStore<C>>,
}

impl<S, C> Service<ServiceRequest> for AuthMiddlewareService<S, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
    C: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let tokens = self.tokens.clone();
        let sessions = self.sessions.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return service.call(req).await;
            }

            let token = match extract_bearer_token(&req) {
                Ok(token) => token,
                Err(message) => {
                    warn!("{} {}: {}", req.method(), req.path(), message);
                    return Ok(unauthorized(req, message));
                }
            };

            let claims = match tokens.validate_token(&token, TokenKind::Access) {
                Ok(claims) => claims,
                Err(AuthError::TokenExpired) => {
                    return Ok(unauthorized(req, "token expired"));
                }
                Err(e) => {
                    warn!("token validation failed on {}: {}", req.path(), e);
                    return Ok(unauthorized(req, "invalid token"));
                }
            };

            let session = match sessions.get(&claims.session_id) {
                Ok(session) => session,
                Err(e) => {
                    warn!("session {} rejected: {}", claims.session_id, e);
                    return Ok(unauthorized(req, "session not found or expired"));
                }
            };

            req.extensions_mut().insert(AuthContext {
                session_id: session.id.clone(),
                profile: claims.profile,
            });

            service.call(req).await
        })
    }
}

fn extract_bearer_token(req: &ServiceRequest) -> Result<String, &'static str> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or("missing authorization token")?;

    let value = header.to_str().map_err(|_| "invalid authorization format")?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or("invalid authorization format")?;

    if token.is_empty() {
        return Err("invalid authorization format");
    }

    Ok(token.to_string())
}

fn unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse {
    let (req, _) = req.into_parts();
    let response =
        HttpResponse::Unauthorized().json(ErrorResponse::new("unauthenticated", message));
    ServiceResponse::new(req, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpRequest};
    use kassie_commons::Profile;

    struct StubConn;

    fn profile() -> Profile {
        Profile {
            name: "local".to_string(),
            hosts: vec!["localhost".to_string()],
            port: 9042,
            keyspace: String::new(),
            auth: None,
            ssl: None,
        }
    }

    fn services() -> (Arc<TokenService>, Arc<SessionStore<StubConn>>) {
        (
            Arc::new(TokenService::new("middleware-test-secret").unwrap()),
            Arc::new(SessionStore::new()),
        )
    }

    async fn echo_context(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<AuthContext>() {
            Some(ctx) => HttpResponse::Ok().body(format!("{}:{}", ctx.session_id, ctx.profile)),
            None => HttpResponse::Ok().body("no-context"),
        }
    }

    macro_rules! test_app {
        ($tokens:expr, $sessions:expr) => {
            test::init_service(
                App::new()
                    .wrap(AuthMiddleware::new($tokens, $sessions))
                    .route("/v1/api/session/login", web::post().to(echo_context))
                    .route("/v1/api/session/profiles", web::get().to(echo_context))
                    .route("/v1/api/schema/keyspaces", web::get().to(echo_context)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_public_paths_bypass_auth() {
        let (tokens, sessions) = services();
        let app = test_app!(tokens, sessions);

        let req = test::TestRequest::get().uri("/v1/api/session/profiles").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/v1/api/session/login").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let (tokens, sessions) = services();
        let app = test_app!(tokens, sessions);

        let req = test::TestRequest::get().uri("/v1/api/schema/keyspaces").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let (tokens, sessions) = services();
        let app = test_app!(tokens, sessions);

        let req = test::TestRequest::get()
            .uri("/v1/api/schema/keyspaces")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_garbage_token_is_rejected() {
        let (tokens, sessions) = services();
        let app = test_app!(tokens, sessions);

        let req = test::TestRequest::get()
            .uri("/v1/api/schema/keyspaces")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_refresh_token_rejected_as_access() {
        let (tokens, sessions) = services();
        sessions.create("sess-1", profile(), Arc::new(StubConn));
        let pair = tokens.generate_token_pair("sess-1", "local").unwrap();

        let app = test_app!(tokens, sessions);
        let req = test::TestRequest::get()
            .uri("/v1/api/schema/keyspaces")
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_without_session_is_rejected() {
        let (tokens, sessions) = services();
        let pair = tokens.generate_token_pair("gone", "local").unwrap();

        let app = test_app!(tokens, sessions);
        let req = test::TestRequest::get()
            .uri("/v1/api/schema/keyspaces")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "session not found or expired");
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_context() {
        let (tokens, sessions) = services();
        sessions.create("sess-42", profile(), Arc::new(StubConn));
        let pair = tokens.generate_token_pair("sess-42", "local").unwrap();

        let app = test_app!(tokens, sessions);
        let req = test::TestRequest::get()
            .uri("/v1/api/schema/keyspaces")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body, "sess-42:local");
    }
}
