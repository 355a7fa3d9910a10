//! Main Kassie client with builder pattern.
//!
//! One client per server; the token pair from login is shared by clones.

use crate::auth::TokenStore;
use crate::error::{KassieLinkError, Result};
use crate::models::{
    ErrorBody, FilterRowsRequest, KeyspacesResponse, LoginRequest, LoginResponse, NextPageRequest,
    ProfilesResponse, QueryRowsRequest, RefreshRequest, RefreshResponse, RowsResponse,
    TableSchemaResponse, TablesResponse,
};
use log::debug;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Marker the server puts in a 401 body when only the access token is stale.
/// Anything else under 401 means the session itself is gone and the caller
/// must log in again.
const TOKEN_EXPIRED_MARKER: &str = "token expired";

#[derive(Clone)]
pub struct KassieClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<TokenStore>,
}

impl KassieClient {
    pub fn builder() -> KassieClientBuilder {
        KassieClientBuilder::new()
    }

    /// Open a session on the named profile and store its token pair.
    pub async fn login(&self, profile: &str) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .public_request(
                Method::POST,
                "/v1/api/session/login",
                Some(&LoginRequest {
                    profile: profile.to_string(),
                }),
            )
            .await?;

        self.tokens.set_pair(&response.access_token, &response.refresh_token);
        Ok(response)
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<RefreshResponse> {
        let refresh_token = self.tokens.refresh_token().ok_or(KassieLinkError::NotLoggedIn)?;

        let response: RefreshResponse = self
            .public_request(
                Method::POST,
                "/v1/api/session/refresh",
                Some(&RefreshRequest { refresh_token }),
            )
            .await?;

        self.tokens.set_access(&response.access_token);
        Ok(response)
    }

    /// End the session server-side and drop the stored tokens.
    pub async fn logout(&self) -> Result<()> {
        let result: Result<serde_json::Value> =
            self.authed_request(Method::POST, "/v1/api/session/logout", None::<&()>).await;
        self.tokens.clear();
        result.map(|_| ())
    }

    pub async fn profiles(&self) -> Result<ProfilesResponse> {
        self.public_request(Method::GET, "/v1/api/session/profiles", None::<&()>).await
    }

    pub async fn keyspaces(&self) -> Result<KeyspacesResponse> {
        self.authed_request(Method::GET, "/v1/api/schema/keyspaces", None::<&()>).await
    }

    pub async fn tables(&self, keyspace: &str) -> Result<TablesResponse> {
        let path = format!("/v1/api/schema/keyspaces/{}/tables", keyspace);
        self.authed_request(Method::GET, &path, None::<&()>).await
    }

    pub async fn table_schema(&self, keyspace: &str, table: &str) -> Result<TableSchemaResponse> {
        let path = format!("/v1/api/schema/keyspaces/{}/tables/{}", keyspace, table);
        self.authed_request(Method::GET, &path, None::<&()>).await
    }

    pub async fn query_rows(
        &self,
        keyspace: &str,
        table: &str,
        page_size: i32,
    ) -> Result<RowsResponse> {
        self.authed_request(
            Method::POST,
            "/v1/api/data/query",
            Some(&QueryRowsRequest {
                keyspace: keyspace.to_string(),
                table: table.to_string(),
                page_size,
            }),
        )
        .await
    }

    pub async fn next_page(&self, cursor_id: &str) -> Result<RowsResponse> {
        self.authed_request(
            Method::POST,
            "/v1/api/data/page",
            Some(&NextPageRequest {
                cursor_id: cursor_id.to_string(),
            }),
        )
        .await
    }

    pub async fn filter_rows(
        &self,
        keyspace: &str,
        table: &str,
        where_clause: &str,
        page_size: i32,
    ) -> Result<RowsResponse> {
        self.authed_request(
            Method::POST,
            "/v1/api/data/filter",
            Some(&FilterRowsRequest {
                keyspace: keyspace.to_string(),
                table: table.to_string(),
                where_clause: where_clause.to_string(),
                page_size,
            }),
        )
        .await
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_logged_in()
    }

    /// Send an authenticated request. On a 401 that names an expired access
    /// token, refresh once and retry once; any further failure surfaces.
    async fn authed_request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        match self.send(method.clone(), path, body, true).await {
            Err(KassieLinkError::Unauthorized(message)) if should_refresh(&message) => {
                debug!("access token expired on {}, refreshing once", path);
                self.refresh().await?;
                self.send(method, path, body, true).await
            }
            other => other,
        }
    }

    /// Send a request without the retry dance (public methods).
    async fn public_request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.send(method, path, body, false).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);

        if authenticated {
            let access = self.tokens.access_token().ok_or(KassieLinkError::NotLoggedIn)?;
            request = request.bearer_auth(access);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| KassieLinkError::Decode(e.to_string()));
        }

        let error_body: ErrorBody = response.json().await.unwrap_or(ErrorBody {
            error: String::new(),
            message: status.to_string(),
        });

        Err(map_status(status, error_body.message))
    }
}

fn map_status(status: StatusCode, message: String) -> KassieLinkError {
    match status {
        StatusCode::UNAUTHORIZED => KassieLinkError::Unauthorized(message),
        StatusCode::BAD_REQUEST => KassieLinkError::InvalidArgument(message),
        StatusCode::NOT_FOUND => KassieLinkError::NotFound(message),
        StatusCode::SERVICE_UNAVAILABLE => KassieLinkError::Unavailable(message),
        _ => KassieLinkError::Server(message),
    }
}

/// Refresh-and-retry applies only to the expired-access-token 401. A dead
/// session also answers 401, but refreshing cannot revive it.
fn should_refresh(message: &str) -> bool {
    message.contains(TOKEN_EXPIRED_MARKER)
}

/// Builder for configuring [`KassieClient`] instances.
pub struct KassieClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl KassieClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the base URL of the Kassie server, e.g. `http://localhost:8080`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<KassieClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| KassieLinkError::InvalidArgument("base_url is required".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(KassieClient {
            base_url,
            http,
            tokens: Arc::new(TokenStore::new()),
        })
    }
}
