// Cluster connection configuration and session construction

use crate::error::{DbError, DbResult};
use crate::session::CqlSession;
use kassie_commons::Profile;
use scylla::statement::Consistency;
use scylla::transport::session::PoolSize;
use scylla::{ExecutionProfile, SessionBuilder};
use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_SIZE: usize = 5;

/// Everything the driver needs to open a session against one cluster.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub hosts: Vec<String>,
    pub port: u16,
    pub keyspace: String,
    pub username: String,
    pub password: String,
    pub consistency: Consistency,
    pub timeout: Duration,
    pub pool_size: usize,
    pub ssl_enabled: bool,
    pub ssl_cert_path: String,
    pub ssl_key_path: String,
    pub ssl_ca_path: String,
    pub ssl_skip_verify: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            port: 9042,
            keyspace: String::new(),
            username: String::new(),
            password: String::new(),
            consistency: Consistency::Quorum,
            timeout: DEFAULT_TIMEOUT,
            pool_size: DEFAULT_POOL_SIZE,
            ssl_enabled: false,
            ssl_cert_path: String::new(),
            ssl_key_path: String::new(),
            ssl_ca_path: String::new(),
            ssl_skip_verify: false,
        }
    }
}

impl ConnectionConfig {
    /// Check host/port sanity and fill zero values with defaults.
    pub fn validate(&mut self) -> DbResult<()> {
        if self.hosts.is_empty() {
            return Err(DbError::NoHosts);
        }
        if self.port == 0 {
            return Err(DbError::InvalidPort);
        }
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        if self.pool_size == 0 {
            self.pool_size = DEFAULT_POOL_SIZE;
        }
        Ok(())
    }

    /// Derive a connection config from a named cluster profile.
    pub fn from_profile(profile: &Profile) -> Self {
        let mut cfg = Self {
            hosts: profile.hosts.clone(),
            port: profile.port,
            keyspace: profile.keyspace.clone(),
            ..Default::default()
        };

        if let Some(auth) = &profile.auth {
            cfg.username = auth.username.clone();
            cfg.password = auth.password.clone();
        }

        if let Some(ssl) = &profile.ssl {
            cfg.ssl_enabled = ssl.enabled;
            cfg.ssl_cert_path = ssl.cert_path.clone();
            cfg.ssl_key_path = ssl.key_path.clone();
            cfg.ssl_ca_path = ssl.ca_path.clone();
            cfg.ssl_skip_verify = ssl.insecure_skip_verify;
        }

        cfg
    }
}

/// Open a driver session for the given config.
///
/// The session carries its own per-host connection pool, default consistency,
/// and request timeout; callers share it through the pool.
pub async fn connect(mut cfg: ConnectionConfig) -> DbResult<CqlSession> {
    cfg.validate()?;

    let execution_profile = ExecutionProfile::builder()
        .consistency(cfg.consistency)
        .request_timeout(Some(cfg.timeout))
        .build();

    let mut builder = SessionBuilder::new()
        .default_execution_profile_handle(execution_profile.into_handle())
        .connection_timeout(cfg.timeout)
        .pool_size(PoolSize::PerHost(
            NonZeroUsize::new(cfg.pool_size).unwrap_or(NonZeroUsize::MIN),
        ));

    for host in &cfg.hosts {
        builder = builder.known_node(format!("{}:{}", host, cfg.port));
    }

    if !cfg.username.is_empty() && !cfg.password.is_empty() {
        builder = builder.user(cfg.username.clone(), cfg.password.clone());
    }

    if !cfg.keyspace.is_empty() {
        builder = builder.use_keyspace(cfg.keyspace.clone(), false);
    }

    if cfg.ssl_enabled {
        builder = builder.ssl_context(Some(build_ssl_context(&cfg)?));
    }

    let session = builder
        .build()
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    Ok(CqlSession::new(session, cfg.timeout))
}

fn build_ssl_context(cfg: &ConnectionConfig) -> DbResult<openssl::ssl::SslContext> {
    use openssl::ssl::{SslContext, SslFiletype, SslMethod, SslVerifyMode};

    let tls = |e: openssl::error::ErrorStack| DbError::ConnectionFailed(format!("tls: {}", e));

    let mut ctx = SslContext::builder(SslMethod::tls()).map_err(tls)?;

    if !cfg.ssl_ca_path.is_empty() {
        ctx.set_ca_file(&cfg.ssl_ca_path).map_err(tls)?;
    }
    if !cfg.ssl_cert_path.is_empty() {
        ctx.set_certificate_file(&cfg.ssl_cert_path, SslFiletype::PEM)
            .map_err(tls)?;
    }
    if !cfg.ssl_key_path.is_empty() {
        ctx.set_private_key_file(&cfg.ssl_key_path, SslFiletype::PEM)
            .map_err(tls)?;
    }

    ctx.set_verify(if cfg.ssl_skip_verify {
        SslVerifyMode::NONE
    } else {
        SslVerifyMode::PEER
    });

    Ok(ctx.build())
}
