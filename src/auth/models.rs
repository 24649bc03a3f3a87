//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hospital staff roles. Closed set; every session carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrator - every screen
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
    /// Doctor - clinical screens, no bed management
    #[serde(alias = "doctor", alias = "DOCTOR")]
    Doctor,
    /// Staff - operational screens, no illness insights
    #[serde(alias = "staff", alias = "STAFF")]
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Staff];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Doctor => write!(f, "Doctor"),
            Role::Staff => write!(f, "Staff"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "staff" => Ok(Role::Staff),
            other => Err(format!(
                "unknown role '{}' (expected Admin, Doctor or Staff)",
                other
            )),
        }
    }
}

/// The authenticated principal as seen by the rest of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub subject_id: String,
    pub role: Role,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Successful login body. The token is the only artifact the client keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Account information returned by the development server on registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!("STAFF".parse::<Role>().unwrap(), Role::Staff);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_accepts_lowercase() {
        let role: Role = serde_json::from_str("\"doctor\"").unwrap();
        assert_eq!(role, Role::Doctor);
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"Staff\"");
    }

    #[test]
    fn test_login_response_without_token() {
        let resp: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.token.is_none());
    }
}
