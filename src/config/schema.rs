//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::models::Role;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub mock: MockConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Which authentication backend the session manager talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Remote,
    Mock,
}

/// Authentication endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Base URL; `/login` and `/register` are appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8080/api/auth".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Credential store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".mediflow/credentials.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// In-process mock backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Passwords accepted for any email
    #[serde(default = "default_mock_passwords")]
    pub passwords: Vec<String>,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_secret")]
    pub secret: String,
}

fn default_mock_passwords() -> Vec<String> {
    vec!["admin123".to_string(), "demo".to_string()]
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_secret() -> String {
    "mediflow-secret-key-change-in-production".to_string()
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            passwords: default_mock_passwords(),
            token_ttl_secs: default_token_ttl_secs(),
            secret: default_secret(),
        }
    }
}

/// Development authentication server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_secret")]
    pub secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// Work factor for stored password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Accounts available at startup
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secret: default_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
            users: Vec::new(),
        }
    }
}

/// Account seeded into the development server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub role: Role,
}
