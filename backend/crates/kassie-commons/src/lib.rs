//! Shared configuration model for Kassie.
//!
//! Holds the cluster profile definitions, the JSON config loader with its
//! lookup chain, and `${NAME}` environment-variable interpolation for
//! credential and TLS path fields. The configuration is loaded once at
//! process start and treated as immutable afterwards.

pub mod config;
pub mod error;

pub use config::env::{interpolate_config, interpolate_env_vars, interpolate_profile};
pub use config::loader::Loader;
pub use config::types::{AuthConfig, Clients, Config, Defaults, Profile, SslConfig, TuiClient, WebClient};
pub use error::ConfigError;
