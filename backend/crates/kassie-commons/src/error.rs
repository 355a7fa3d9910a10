// Configuration error types for Kassie

use thiserror::Error;

/// Errors raised while loading, interpolating, or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file found on the lookup chain (or the explicit path is missing)
    #[error("config file not found: {0}")]
    FileNotFound(String),

    /// The file exists but could not be read
    #[error("failed to read config file: {0}")]
    FileRead(String),

    /// The file is empty or not valid JSON
    #[error("invalid JSON format: {0}")]
    InvalidJson(String),

    /// A profile references an unknown name
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// Two profiles share the same name
    #[error("duplicate profile name: {0}")]
    DuplicateProfile(String),

    /// The config declares no profiles at all
    #[error("no profiles defined")]
    NoProfiles,

    /// A profile has an empty name or otherwise malformed shape
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A profile lists no hosts
    #[error("no hosts specified for profile: {0}")]
    NoHosts(String),

    /// A port is outside [1, 65535]
    #[error("invalid port number for {0}")]
    InvalidPort(String),

    /// defaults.page_size outside [1, 10000]
    #[error("invalid page size: {0}")]
    InvalidPageSize(i64),

    /// defaults.timeout_ms outside [100, 300000]
    #[error("invalid timeout: {0} ms")]
    InvalidTimeout(i64),

    /// `${NAME}` referenced an environment variable that is not set
    #[error("environment variable not found: {0}")]
    VarNotFound(String),

    /// `${NAME}` expansion looped back on itself or exceeded the depth limit
    #[error("circular reference in environment variables")]
    CircularReference,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
