// JSON config loader with a fixed lookup chain
//
// Resolution order: explicit path (when given), then
// ~/.config/kassie/config.json, then ./kassie.config.json. Loading fills
// defaults, interpolates environment variables, and validates before
// handing the config out.

use crate::config::env::interpolate_config;
use crate::config::types::Config;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

pub struct Loader {
    primary_path: PathBuf,
    fallback_path: PathBuf,
    explicit_path: Option<PathBuf>,
}

impl Loader {
    pub fn new() -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        Self {
            primary_path: home.join(".config").join("kassie").join("config.json"),
            fallback_path: PathBuf::from("kassie.config.json"),
            explicit_path: None,
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut loader = Self::new();
        loader.explicit_path = Some(path.into());
        loader
    }

    /// Resolve which config file would be loaded.
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(explicit) = &self.explicit_path {
            if is_file(explicit) {
                return Ok(explicit.clone());
            }
            return Err(ConfigError::FileNotFound(explicit.display().to_string()));
        }

        if is_file(&self.primary_path) {
            return Ok(self.primary_path.clone());
        }
        if is_file(&self.fallback_path) {
            return Ok(self.fallback_path.clone());
        }

        Err(ConfigError::FileNotFound("no config file on lookup chain".to_string()))
    }

    pub fn load(&self) -> Result<Config> {
        let path = self.config_path()?;
        self.load_from_path(&path)
    }

    pub fn load_from_path(&self, path: &Path) -> Result<Config> {
        let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                ConfigError::FileRead("permission denied".to_string())
            }
            _ => ConfigError::FileRead(e.to_string()),
        })?;

        if data.trim().is_empty() {
            return Err(ConfigError::InvalidJson("file is empty".to_string()));
        }

        let mut config: Config =
            serde_json::from_str(&data).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;

        config.set_defaults();
        interpolate_config(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    pub fn exists(&self) -> bool {
        self.config_path().is_ok()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "version": "1",
        "profiles": [
            {"name": "local", "hosts": ["127.0.0.1"], "port": 9042, "keyspace": "dev"}
        ],
        "defaults": {"default_profile": "local", "page_size": 100, "timeout_ms": 10000}
    }"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID);
        let config = Loader::with_path(file.path()).load().unwrap();
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].name, "local");
        assert_eq!(config.defaults.default_profile, "local");
    }

    #[test]
    fn test_explicit_path_missing() {
        let err = Loader::with_path("/nonexistent/kassie.json").load().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_empty_file() {
        let file = write_config("   ");
        let err = Loader::with_path(file.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_config("{not json");
        let err = Loader::with_path(file.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let file = write_config(r#"{"profiles": [{"name": "p", "hosts": [], "port": 9042}]}"#);
        let err = Loader::with_path(file.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::NoHosts(_)));
    }

    #[test]
    fn test_defaults_applied_before_validation() {
        let file = write_config(r#"{"profiles": [{"name": "p", "hosts": ["h"], "port": 9042}]}"#);
        let config = Loader::with_path(file.path()).load().unwrap();
        assert_eq!(config.defaults.page_size, 100);
        assert_eq!(config.defaults.timeout_ms, 10_000);
    }
}
