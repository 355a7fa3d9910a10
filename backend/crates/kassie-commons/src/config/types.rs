// Configuration types for Kassie
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration file shape.
///
/// Loaded from JSON once at startup; every consumer receives a shared,
/// read-only reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub clients: Clients,
}

/// Named cluster descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub hosts: Vec<String>,
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keyspace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslConfig>,
}

/// Username/password credentials for a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

/// TLS settings for a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SslConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_path: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

/// Cross-client defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub default_profile: String,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: i64,
}

/// Client-specific blocks, carried through for the TUI and web front ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clients {
    #[serde(default)]
    pub tui: TuiClient,
    #[serde(default)]
    pub web: WebClient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiClient {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub vim_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebClient {
    #[serde(default)]
    pub auto_open_browser: bool,
    #[serde(default = "default_web_port")]
    pub default_port: u16,
}

fn default_page_size() -> i64 {
    100
}

fn default_timeout_ms() -> i64 {
    10_000
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_profile: String::new(),
            page_size: default_page_size(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TuiClient {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            vim_mode: false,
        }
    }
}

impl Default for WebClient {
    fn default() -> Self {
        Self {
            auto_open_browser: false,
            default_port: default_web_port(),
        }
    }
}

impl Profile {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("profile name is empty".to_string()));
        }
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts(self.name.clone()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.name.clone()));
        }
        Ok(())
    }

    /// Whether the profile enables TLS.
    pub fn ssl_enabled(&self) -> bool {
        self.ssl.as_ref().map(|s| s.enabled).unwrap_or(false)
    }
}

impl Config {
    /// Fill missing fields with defaults. Runs before validation so an
    /// abbreviated config file is still usable.
    pub fn set_defaults(&mut self) {
        if self.version.is_empty() {
            self.version = "1".to_string();
        }
        if self.defaults.page_size == 0 {
            self.defaults.page_size = default_page_size();
        }
        if self.defaults.timeout_ms == 0 {
            self.defaults.timeout_ms = default_timeout_ms();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let mut seen = std::collections::HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::DuplicateProfile(profile.name.clone()));
            }
            profile.validate()?;
        }

        if self.defaults.page_size < 1 || self.defaults.page_size > 10_000 {
            return Err(ConfigError::InvalidPageSize(self.defaults.page_size));
        }
        if self.defaults.timeout_ms < 100 || self.defaults.timeout_ms > 300_000 {
            return Err(ConfigError::InvalidTimeout(self.defaults.timeout_ms));
        }
        if self.clients.web.default_port == 0 {
            return Err(ConfigError::InvalidPort("clients.web".to_string()));
        }

        Ok(())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// The configured default profile, falling back to the first one.
    pub fn default_profile(&self) -> Result<&Profile> {
        if !self.defaults.default_profile.is_empty() {
            return self.profile(&self.defaults.default_profile);
        }
        self.profiles
            .first()
            .ok_or_else(|| ConfigError::ProfileNotFound("default".to_string()))
    }
}
