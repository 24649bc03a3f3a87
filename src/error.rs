//! Error types for MediFlow

use thiserror::Error;

/// Failure to turn a raw session token into claims
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token is missing required claims: {0}")]
    MissingClaims(String),

    #[error("Token expired")]
    Expired,
}

/// Failure to establish a session against an authentication backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Please fill in all fields")]
    MissingCredentials,

    #[error("Login superseded by a newer session change")]
    Superseded,
}

impl AuthError {
    /// Message shown to the user. Bad credentials and an unreachable endpoint
    /// read the same so the login form does not reveal which accounts exist.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials | AuthError::Unreachable(_) => {
                "Invalid credentials or role. Please try again."
            }
            AuthError::MissingCredentials => "Please fill in all fields",
            AuthError::Superseded => "Login was cancelled",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Token error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Config file not found. Run 'mediflow init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
