// Server runtime configuration
//
// Bind address, worker count, CORS allow-list, and logging knobs come from
// KASSIE_* environment variables. The cluster profile config is separate:
// it is the JSON file loaded through kassie-commons.

use serde::{Deserialize, Serialize};

/// Runtime settings for the server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// 0 means one worker per CPU core.
    pub workers: usize,
    /// Explicit path to the profile config file; empty uses the lookup chain.
    pub config_path: String,
    /// CORS allow-list. Empty or ["*"] serves a wildcard.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub file_path: String,
    pub log_to_console: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: 0,
                config_path: String::new(),
                allowed_origins: vec!["*".to_string()],
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                file_path: "logs/kassie-server.log".to_string(),
                log_to_console: true,
            },
        }
    }
}

impl ServerConfig {
    /// Build the config from KASSIE_* environment variables over defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(host) = std::env::var("KASSIE_HOST") {
            if !host.is_empty() {
                cfg.server.host = host;
            }
        }
        if let Some(port) = env_parse::<u16>("KASSIE_HTTP_PORT") {
            cfg.server.port = port;
        }
        if let Some(workers) = env_parse::<usize>("KASSIE_WORKERS") {
            cfg.server.workers = workers;
        }
        if let Ok(path) = std::env::var("KASSIE_CONFIG") {
            cfg.server.config_path = path;
        }
        if let Ok(origins) = std::env::var("KASSIE_ALLOWED_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !parsed.is_empty() {
                cfg.server.allowed_origins = parsed;
            }
        }
        if let Ok(level) = std::env::var("KASSIE_LOG_LEVEL") {
            if !level.is_empty() {
                cfg.logging.level = level;
            }
        }
        if let Ok(file) = std::env::var("KASSIE_LOG_FILE") {
            if !file.is_empty() {
                cfg.logging.file_path = file;
            }
        }

        cfg
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
