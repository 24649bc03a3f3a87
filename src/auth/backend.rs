//! Authentication backends
//!
//! The session manager talks to whichever backend is configured through the
//! same asynchronous, fallible contract: the remote endpoint in production
//! and an in-process mock for demos and tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::token;
use crate::config::{AuthConfig, MockConfig};
use crate::error::{AuthError, Error, Result};

/// Exchanges credentials for a session token
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticate and return the raw session token
    async fn login(&self, request: &LoginRequest) -> std::result::Result<String, AuthError>;

    /// Create an account
    async fn register(&self, request: &RegisterRequest) -> std::result::Result<(), AuthError>;
}

/// Backend calling the remote authentication endpoint over HTTP
pub struct HttpAuthBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAuthBackend {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> std::result::Result<reqwest::Response, AuthError> {
        let url = format!("{}/{}", self.endpoint, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        classify_status(response.status())?;
        Ok(response)
    }
}

/// Map an HTTP status onto the login error taxonomy
fn classify_status(status: StatusCode) -> std::result::Result<(), AuthError> {
    if status.is_success() {
        Ok(())
    } else if status.is_client_error() {
        Err(AuthError::InvalidCredentials)
    } else {
        Err(AuthError::Unreachable(format!("endpoint returned {}", status)))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> std::result::Result<String, AuthError> {
        let response = self.post("login", request).await?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Unreachable(format!("unreadable login response: {}", e)))?;

        body.token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn register(&self, request: &RegisterRequest) -> std::result::Result<(), AuthError> {
        self.post("register", request).await.map(|_| ())
    }
}

/// In-process backend. Any email with one of the shared demo passwords logs in
/// under the claimed role; registered accounts must use their own password
/// and role.
pub struct MockAuthBackend {
    config: MockConfig,
    accounts: Mutex<HashMap<String, RegisterRequest>>,
}

impl MockAuthBackend {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            accounts: Mutex::new(HashMap::new()),
        }
    }

    fn sign(&self, request: &LoginRequest) -> std::result::Result<String, AuthError> {
        token::issue(
            &request.email,
            Some(&request.email),
            request.role,
            self.config.token_ttl_secs,
            &self.config.secret,
        )
        .map_err(|e| AuthError::Unreachable(e.to_string()))
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, request: &LoginRequest) -> std::result::Result<String, AuthError> {
        let registered = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|_| AuthError::Unreachable("mock backend lock poisoned".to_string()))?;
            accounts.get(&request.email).cloned()
        };

        let accepted = match registered {
            Some(account) => account.password == request.password && account.role == request.role,
            None => self.config.passwords.iter().any(|p| p == &request.password),
        };

        if !accepted {
            return Err(AuthError::InvalidCredentials);
        }
        self.sign(request)
    }

    async fn register(&self, request: &RegisterRequest) -> std::result::Result<(), AuthError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::Unreachable("mock backend lock poisoned".to_string()))?;

        if accounts.contains_key(&request.email) {
            return Err(AuthError::InvalidCredentials);
        }
        accounts.insert(request.email.clone(), request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn login(email: &str, password: &str, role: Role) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::OK).is_ok());
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            Err(AuthError::InvalidCredentials)
        );
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY),
            Err(AuthError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_accepts_demo_password() {
        let backend = MockAuthBackend::default();
        let raw = backend.login(&login("a@b.com", "demo", Role::Doctor)).await.unwrap();
        let claims = token::decode(&raw).unwrap();

        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_mock_rejects_wrong_password() {
        let backend = MockAuthBackend::default();
        let result = backend.login(&login("a@b.com", "nope", Role::Admin)).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_mock_registered_account_role_must_match() {
        let backend = MockAuthBackend::default();
        backend
            .register(&RegisterRequest {
                email: "nurse@ward.org".to_string(),
                password: "s3cret".to_string(),
                role: Role::Staff,
            })
            .await
            .unwrap();

        assert!(backend
            .login(&login("nurse@ward.org", "s3cret", Role::Staff))
            .await
            .is_ok());
        assert_eq!(
            backend.login(&login("nurse@ward.org", "s3cret", Role::Admin)).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            backend.login(&login("nurse@ward.org", "demo", Role::Staff)).await,
            Err(AuthError::InvalidCredentials)
        );
    }
}
