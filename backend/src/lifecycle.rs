//! Server lifecycle management helpers.
//!
//! This module encapsulates the heavy lifting that would otherwise clutter
//! `main.rs`: bootstrapping the pool, registries, and token service, wiring
//! the HTTP server, and coordinating graceful shutdown.

use crate::ServerConfig;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use kassie_api::middleware::AuthMiddleware;
use kassie_api::{routes, DbPool, Sessions};
use kassie_auth::TokenService;
use kassie_commons::{Config, Loader};
use kassie_server::middleware;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Inbound and outbound payloads are bounded at 10 MiB per call.
const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Inflight requests get this long to drain on shutdown before a force stop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Both reapers wake on this cadence.
const REAP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Aggregated application state shared across the HTTP server and shutdown
/// handling.
pub struct ApplicationComponents {
    pub config: Arc<Config>,
    pub pool: Arc<DbPool>,
    pub sessions: Arc<Sessions>,
    pub tokens: Arc<TokenService>,
}

/// Load the profile config and construct the pool, registries, and token
/// service.
pub async fn bootstrap(server_cfg: &ServerConfig) -> Result<ApplicationComponents> {
    let loader = if server_cfg.server.config_path.is_empty() {
        Loader::new()
    } else {
        Loader::with_path(&server_cfg.server.config_path)
    };
    let config = Arc::new(loader.load().context("failed to load profile config")?);
    info!(
        "loaded {} profile(s) from {}",
        config.profiles.len(),
        loader
            .config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );

    let jwt_secret = match std::env::var("KASSIE_JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("using default JWT secret, set KASSIE_JWT_SECRET env variable");
            "change-this-secret-in-production".to_string()
        }
    };
    let tokens = Arc::new(TokenService::new(&jwt_secret).context("invalid JWT secret")?);
    info!("token service initialized (HS256)");

    let pool = Arc::new(DbPool::new());
    let sessions = Arc::new(Sessions::new());

    Ok(ApplicationComponents {
        config,
        pool,
        sessions,
        tokens,
    })
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(server_cfg: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", server_cfg.server.host, server_cfg.server.port);
    info!("starting HTTP server on {}", bind_addr);

    let reapers = spawn_reapers(components.sessions.clone());

    let config = components.config.clone();
    let pool = components.pool.clone();
    let sessions = components.sessions.clone();
    let tokens = components.tokens.clone();
    let allowed_origins = server_cfg.server.allowed_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(tokens.clone(), sessions.clone()))
            .wrap(middleware::CorsPolicy::new(allowed_origins.clone()))
            .wrap(middleware::request_logger())
            .app_data(web::JsonConfig::default().limit(MAX_MESSAGE_SIZE))
            .app_data(web::PayloadConfig::default().limit(MAX_MESSAGE_SIZE))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .workers(if server_cfg.server.workers == 0 {
        num_cpus::get()
    } else {
        server_cfg.server.workers
    })
    .shutdown_timeout(SHUTDOWN_GRACE.as_secs())
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                log::error!("server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, initiating graceful shutdown");
            server_handle.stop(true).await;
        }
    }

    for reaper in reapers {
        reaper.abort();
    }

    components.sessions.close_all();
    components.pool.close_all().await;

    info!("server shutdown complete");
    Ok(())
}

/// Two long-lived sweepers, one per registry. Eviction is best-effort: a
/// racing Get may still hand out an entry the reaper is about to drop, and
/// the next Get on that id then misses.
fn spawn_reapers(sessions: Arc<Sessions>) -> Vec<tokio::task::JoinHandle<()>> {
    let session_store = sessions.clone();
    let session_reaper = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REAP_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = session_store.reap_expired();
            if evicted > 0 {
                info!("session reaper evicted {} session(s)", evicted);
            }
        }
    });

    let cursor_reaper = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REAP_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = sessions.reap_cursors();
            if evicted > 0 {
                info!("cursor reaper evicted {} cursor(s)", evicted);
            }
        }
    });

    vec![session_reaper, cursor_reaper]
}
