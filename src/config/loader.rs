//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "mediflow.toml";

/// Load configuration from mediflow.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_config_or_default() -> Result<Config> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# MediFlow Configuration

[auth]
backend = "remote"  # or "mock"
endpoint = "${MEDIFLOW_AUTH_ENDPOINT:-http://localhost:8080/api/auth}"
timeout_secs = 10

[store]
path = ".mediflow/credentials.json"

# Mock backend: any email logs in with one of these passwords
[mock]
passwords = ["admin123", "demo"]
token_ttl_secs = 3600
# secret = "${MEDIFLOW_SECRET}"

# Development auth server (mediflow serve-auth)
[server]
host = "127.0.0.1"
port = 8080
token_ttl_secs = 3600
# secret = "${MEDIFLOW_SECRET}"

[[server.users]]
email = "admin@mediflow.local"
password = "admin123"
role = "Admin"

[[server.users]]
email = "doctor@mediflow.local"
password = "demo"
role = "Doctor"

[[server.users]]
email = "staff@mediflow.local"
password = "demo"
role = "Staff"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("MEDIFLOW_TEST_VAR", "hello");
        let content = "value = \"${MEDIFLOW_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("MEDIFLOW_TEST_VAR");
    }

    #[test]
    fn test_default_content_parses() {
        let config: Config = toml::from_str(&interpolate_env_vars(default_config_content())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.users.len(), 3);
        assert_eq!(config.mock.passwords, vec!["admin123", "demo"]);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[auth]\nbackend = \"mock\"\n").unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.auth.backend, crate::config::BackendKind::Mock);
        assert_eq!(config.auth.timeout_secs, 10);
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }
}
