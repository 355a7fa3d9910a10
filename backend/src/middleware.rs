//! Server-wide middleware helpers.
//!
//! Keeps the Actix application setup focused by providing reusable
//! constructors for the CORS policy and request logging.
//!
//! The CORS contract: allow-listed origins are reflected back; otherwise a
//! wildcard is served when the list is empty or explicitly `*`. Preflight
//! OPTIONS requests short-circuit with 204 and never reach authentication.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::Method;
use actix_web::{middleware, Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const MAX_AGE: &str = "3600";

/// Build the request logger middleware.
pub fn request_logger() -> middleware::Logger {
    middleware::Logger::default()
}

/// CORS middleware factory configured with an origin allow-list.
#[derive(Clone)]
pub struct CorsPolicy {
    origins: Arc<Vec<String>>,
}

impl CorsPolicy {
    pub fn new(origins: Vec<String>) -> Self {
        Self {
            origins: Arc::new(origins),
        }
    }

    fn is_allowed(&self, origin: &str) -> bool {
        self.origins.is_empty()
            || self.origins.iter().any(|allowed| allowed == "*" || allowed == origin)
    }

    /// The Access-Control-Allow-Origin value for a request, if any.
    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match origin {
            Some(o) if !o.is_empty() && self.is_allowed(o) => Some(o.to_string()),
            _ if self.origins.is_empty() || self.origins.iter().any(|a| a == "*") => {
                Some("*".to_string())
            }
            _ => None,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsPolicy
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsPolicyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsPolicyMiddleware {
            service,
            policy: self.clone(),
        }))
    }
}

pub struct CorsPolicyMiddleware<S> {
    service: S,
    policy: CorsPolicy,
}

impl<S, B> Service<ServiceRequest> for CorsPolicyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let origin = req
            .headers()
            .get(actix_web::http::header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let allow_origin = self.policy.allow_origin(origin.as_deref());

        if req.method() == Method::OPTIONS {
            let mut builder = HttpResponse::NoContent();
            if let Some(value) = &allow_origin {
                builder.insert_header(("Access-Control-Allow-Origin", value.as_str()));
            }
            builder.insert_header(("Access-Control-Allow-Methods", ALLOW_METHODS));
            builder.insert_header(("Access-Control-Allow-Headers", ALLOW_HEADERS));
            builder.insert_header(("Access-Control-Max-Age", MAX_AGE));

            let response = builder.finish();
            let (req, _) = req.into_parts();
            return Box::pin(ready(Ok(
                ServiceResponse::new(req, response).map_into_right_body()
            )));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;

            let headers = res.headers_mut();
            if let Some(value) = allow_origin.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
                headers.insert(
                    HeaderName::from_static("access-control-allow-origin"),
                    value,
                );
            }
            headers.insert(
                HeaderName::from_static("access-control-allow-methods"),
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                HeaderName::from_static("access-control-allow-headers"),
                HeaderValue::from_static(ALLOW_HEADERS),
            );
            headers.insert(
                HeaderName::from_static("access-control-max-age"),
                HeaderValue::from_static(MAX_AGE),
            );

            Ok(res.map_into_left_body())
        })
    }
}
