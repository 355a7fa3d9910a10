// Environment-variable interpolation for config fields
//
// Credential and TLS path fields may reference `${NAME}` environment
// variables. Expansion is recursive (a variable's value may itself contain
// references) with a hard depth limit of 10; cycles are detected through the
// visited set.

use crate::config::types::{Config, Profile};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const MAX_DEPTH: usize = 10;

fn env_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"))
}

/// Expand every `${NAME}` reference in `value`.
pub fn interpolate_env_vars(value: &str) -> Result<String> {
    interpolate_recursive(value, &mut HashSet::new(), 0)
}

fn interpolate_recursive(value: &str, visited: &mut HashSet<String>, depth: usize) -> Result<String> {
    if depth > MAX_DEPTH {
        return Err(ConfigError::CircularReference);
    }

    if !value.contains("${") {
        return Ok(value.to_string());
    }

    let mut result = value.to_string();
    for captures in env_var_regex().captures_iter(value) {
        let full_match = &captures[0];
        let var_name = &captures[1];

        if visited.contains(var_name) {
            return Err(ConfigError::CircularReference);
        }

        let env_value = std::env::var(var_name)
            .map_err(|_| ConfigError::VarNotFound(var_name.to_string()))?;

        visited.insert(var_name.to_string());
        let interpolated = interpolate_recursive(&env_value, visited, depth + 1)?;
        visited.remove(var_name);

        result = result.replace(full_match, &interpolated);
    }

    Ok(result)
}

/// Interpolate the auth and SSL string fields of one profile in place.
pub fn interpolate_profile(profile: &mut Profile) -> Result<()> {
    if let Some(auth) = profile.auth.as_mut() {
        if auth.username.contains("${") {
            auth.username = interpolate_env_vars(&auth.username)?;
        }
        if auth.password.contains("${") {
            auth.password = interpolate_env_vars(&auth.password)?;
        }
    }

    if let Some(ssl) = profile.ssl.as_mut() {
        if ssl.cert_path.contains("${") {
            ssl.cert_path = interpolate_env_vars(&ssl.cert_path)?;
        }
        if ssl.key_path.contains("${") {
            ssl.key_path = interpolate_env_vars(&ssl.key_path)?;
        }
        if ssl.ca_path.contains("${") {
            ssl.ca_path = interpolate_env_vars(&ssl.ca_path)?;
        }
    }

    Ok(())
}

/// Interpolate every profile of the config in place.
pub fn interpolate_config(config: &mut Config) -> Result<()> {
    for profile in config.profiles.iter_mut() {
        interpolate_profile(profile)?;
    }
    Ok(())
}
