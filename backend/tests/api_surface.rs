//! HTTP-surface tests that need no live cluster.
//!
//! Wires the real routes, middleware, and application state the way the
//! lifecycle module does, then drives the public/authenticated boundary.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use kassie_api::middleware::AuthMiddleware;
use kassie_api::{routes, DbPool, Sessions};
use kassie_auth::TokenService;
use kassie_commons::{Clients, Config, Defaults, Profile};
use serde_json::json;
use std::sync::Arc;

struct TestState {
    config: Arc<Config>,
    pool: Arc<DbPool>,
    sessions: Arc<Sessions>,
    tokens: Arc<TokenService>,
}

fn state() -> TestState {
    let config = Config {
        version: "1".to_string(),
        profiles: vec![Profile {
            name: "local".to_string(),
            hosts: vec!["127.0.0.1".to_string()],
            port: 9042,
            keyspace: String::new(),
            auth: None,
            ssl: None,
        }],
        defaults: Defaults::default(),
        clients: Clients::default(),
    };

    TestState {
        config: Arc::new(config),
        pool: Arc::new(DbPool::new()),
        sessions: Arc::new(Sessions::new()),
        tokens: Arc::new(TokenService::new("api-surface-test-secret").unwrap()),
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new($state.tokens.clone(), $state.sessions.clone()))
                .app_data(web::Data::new($state.config.clone()))
                .app_data(web::Data::new($state.pool.clone()))
                .app_data(web::Data::new($state.sessions.clone()))
                .app_data(web::Data::new($state.tokens.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_healthz_is_public() {
    let state = state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_profiles_need_no_token() {
    let state = state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/v1/api/session/profiles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["profiles"][0]["name"], "local");
    // Credentials never appear in profile listings.
    assert!(body["profiles"][0].get("auth").is_none());
}

#[actix_web::test]
async fn test_login_unknown_profile_is_not_found() {
    let state = state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/api/session/login")
        .set_json(json!({"profile": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_login_empty_profile_is_invalid() {
    let state = state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/api/session/login")
        .set_json(json!({"profile": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_refresh_rejects_garbage_token() {
    let state = state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/api/session/refresh")
        .set_json(json!({"refreshToken": "not-a-token"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_refresh_rejects_access_token() {
    let state = state();
    let pair = state.tokens.generate_token_pair("sess-1", "local").unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/api/session/refresh")
        .set_json(json!({"refreshToken": pair.access_token}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_protected_routes_reject_missing_token() {
    let state = state();
    let app = test_app!(state);

    for (method, uri) in [
        ("GET", "/v1/api/schema/keyspaces"),
        ("GET", "/v1/api/schema/keyspaces/ks/tables"),
        ("GET", "/v1/api/schema/keyspaces/ks/tables/t"),
        ("POST", "/v1/api/data/query"),
        ("POST", "/v1/api/data/page"),
        ("POST", "/v1/api/data/filter"),
        ("POST", "/v1/api/session/logout"),
    ] {
        let req = match method {
            "GET" => test::TestRequest::get().uri(uri).to_request(),
            _ => test::TestRequest::post().uri(uri).set_json(json!({})).to_request(),
        };
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} must require a token",
            method,
            uri
        );
    }
}

#[actix_web::test]
async fn test_stale_token_after_unknown_session() {
    // A well-signed access token whose session was never created (or has
    // been logged out) must be rejected by the interceptor, not reach the
    // service layer.
    let state = state();
    let pair = state.tokens.generate_token_pair("ghost-session", "local").unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/api/session/logout")
        .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "session not found or expired");
}
