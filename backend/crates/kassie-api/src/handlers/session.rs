//! Session service: login, refresh, logout, profiles.

use crate::context::AuthContext;
use crate::error::ApiError;
use crate::models::{
    LoginRequest, LoginResponse, LogoutResponse, ProfileInfo, ProfilesResponse, RefreshRequest,
    RefreshResponse,
};
use crate::{DbPool, Sessions};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use kassie_auth::{AuthError, TokenService};
use kassie_commons::Config;
use kassie_db::{connect, ConnectionConfig};
use log::{info, warn};
use std::sync::Arc;

/// POST /v1/api/session/login
///
/// Resolves the profile, acquires the shared driver handle from the pool,
/// mints a session and its token pair. A token-generation failure deletes
/// the freshly created session so no orphan outlives the failed login.
pub async fn login(
    body: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<DbPool>>,
    sessions: web::Data<Arc<Sessions>>,
    tokens: web::Data<Arc<TokenService>>,
) -> Result<HttpResponse, ApiError> {
    if body.profile.is_empty() {
        return Err(ApiError::InvalidArgument("profile name is required".to_string()));
    }

    let profile = config
        .profile(&body.profile)
        .map_err(|_| ApiError::NotFound(format!("profile not found: {}", body.profile)))?
        .clone();

    let conn_cfg = ConnectionConfig::from_profile(&profile);
    let connection = pool
        .get_or_create(&profile.name, || connect(conn_cfg))
        .await
        .map_err(|e| ApiError::Unavailable(format!("failed to connect to database: {}", e)))?;

    let session_id = uuid::Uuid::new_v4().to_string();
    sessions.create(&session_id, profile.clone(), connection);

    let pair = match tokens.generate_token_pair(&session_id, &profile.name) {
        Ok(pair) => pair,
        Err(e) => {
            sessions.delete(&session_id);
            return Err(ApiError::Internal(format!("failed to generate tokens: {}", e)));
        }
    };

    info!("session {} opened on profile {}", session_id, profile.name);

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_at: pair.access_expires_at,
        profile: ProfileInfo::from(&profile),
    }))
}

/// POST /v1/api/session/refresh
///
/// Exchanges a refresh token for a new access token. Stateless: the session
/// registry is not consulted, so a refreshed token for a dead session still
/// fails at the next authenticated call.
pub async fn refresh(
    body: web::Json<RefreshRequest>,
    tokens: web::Data<Arc<TokenService>>,
) -> Result<HttpResponse, ApiError> {
    if body.refresh_token.is_empty() {
        return Err(ApiError::InvalidArgument("refresh token is required".to_string()));
    }

    let (access_token, expires_at) =
        tokens
            .refresh_access_token(&body.refresh_token)
            .map_err(|e| match e {
                AuthError::TokenExpired => ApiError::Unauthenticated("token expired".to_string()),
                AuthError::SigningFailed(msg) => ApiError::Internal(msg),
                other => {
                    warn!("refresh rejected: {}", other);
                    ApiError::Unauthenticated("invalid refresh token".to_string())
                }
            })?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        expires_at,
    }))
}

/// POST /v1/api/session/logout
///
/// Deletes the caller's session, which drops its driver reference and
/// destroys its cursor registry. Always succeeds; logging out twice is a
/// no-op at this layer (the second call dies earlier, at token validation).
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    if let Some(ctx) = req.extensions().get::<AuthContext>().cloned() {
        sessions.delete(&ctx.session_id);
        info!("session {} logged out", ctx.session_id);
    }

    Ok(HttpResponse::Ok().json(LogoutResponse {}))
}

/// GET /v1/api/session/profiles: public profile metadata from the immutable
/// config; never requires authentication and never leaks credentials.
pub async fn profiles(config: web::Data<Arc<Config>>) -> Result<HttpResponse, ApiError> {
    let profiles = config.profiles.iter().map(ProfileInfo::from).collect();
    Ok(HttpResponse::Ok().json(ProfilesResponse { profiles }))
}
