//! API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use super::server::SharedState;
use crate::auth::models::{AccountInfo, LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::token;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn login(State(state): State<SharedState>, Json(req): Json<LoginRequest>) -> Response {
    let state = state.read().await;

    let Some(account) = state.accounts.get(&req.email) else {
        warn!("Login for unknown account {}", req.email);
        return failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let password_ok = bcrypt::verify(&req.password, &account.password_hash).unwrap_or(false);
    if !password_ok || account.role != req.role {
        warn!("Rejected login for {}", req.email);
        return failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    match token::issue(
        &account.id,
        Some(&account.email),
        account.role,
        state.token_ttl_secs,
        &state.secret,
    ) {
        Ok(token) => {
            info!("Issued token for {} ({})", account.email, account.role);
            (
                StatusCode::OK,
                Json(LoginResponse { token: Some(token) }),
            )
                .into_response()
        }
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Email and password are required");
    }

    let mut state = state.write().await;
    if state.accounts.contains_key(&req.email) {
        return failure(StatusCode::CONFLICT, "Account already exists");
    }

    match state.add_account(&req.email, &req.password, req.role) {
        Ok(account) => {
            info!("Registered {} as {}", account.email, account.role);
            (
                StatusCode::CREATED,
                Json(ApiResponse::ok(AccountInfo {
                    id: account.id,
                    email: account.email,
                    role: account.role,
                })),
            )
                .into_response()
        }
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
