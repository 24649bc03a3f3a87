//! Development authentication server
//!
//! Implements the login contract the dashboard expects from its identity
//! provider so the client can be exercised end to end without one.

use axum::{
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::models::Role;
use crate::config::ServerConfig;
use crate::error::{Error, Result};

use super::routes;

/// A registered account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Accounts and token settings shared across handlers
pub struct AppState {
    pub accounts: HashMap<String, Account>,
    pub secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    /// Build state from config, hashing every seeded password
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut state = Self {
            accounts: HashMap::new(),
            secret: config.secret.clone(),
            token_ttl_secs: config.token_ttl_secs,
            bcrypt_cost: config.bcrypt_cost,
        };

        for user in &config.users {
            state.add_account(&user.email, &user.password, user.role)?;
        }

        Ok(state)
    }

    /// Register an account. Emails are unique.
    pub fn add_account(&mut self, email: &str, password: &str, role: Role) -> Result<Account> {
        if self.accounts.contains_key(email) {
            return Err(Error::Other(format!("Account '{}' already exists", email)));
        }

        let password_hash = bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))?;

        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash,
            role,
        };
        self.accounts.insert(email.to_string(), account.clone());
        Ok(account)
    }
}

/// Run the development auth server
pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    let state = Arc::new(RwLock::new(AppState::from_config(config)?));

    tracing::info!("Auth server listening on {}", addr);
    serve(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/register", post(routes::register))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
