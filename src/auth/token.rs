//! Session token codec
//!
//! Tokens are JWTs issued by the authentication endpoint. The client only
//! reads their claims; signatures are checked server-side, so decoding here
//! never verifies them.

use crate::auth::models::{Role, User};
use crate::error::{DecodeError, Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Decoded token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal ID)
    pub sub: String,
    /// Role the session was granted
    pub role: Role,
    /// Expiration, seconds since epoch
    pub exp: i64,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Login email, when the issuer includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, role: Role, exp: i64) -> Self {
        Self {
            sub: sub.into(),
            role,
            exp,
            iat: None,
            email: None,
        }
    }

    /// A token is valid only while `exp` is strictly after `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Check expiry against the wall clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }

    pub fn user(&self) -> User {
        User {
            subject_id: self.sub.clone(),
            role: self.role,
        }
    }
}

/// Decode a raw token into claims without verifying its signature
pub fn decode(raw: &str) -> std::result::Result<Claims, DecodeError> {
    let raw = raw.trim();
    let mut segments = raw.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    jsonwebtoken::decode_header(raw)
        .map_err(|e| DecodeError::Malformed(format!("invalid header: {}", e)))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| DecodeError::Malformed(format!("invalid payload encoding: {}", e)))?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::Malformed(format!("payload is not JSON: {}", e)))?;

    serde_json::from_value(value).map_err(|e| DecodeError::MissingClaims(e.to_string()))
}

/// Decode and reject tokens that are no longer valid at `now`
pub fn decode_active(raw: &str, now: i64) -> std::result::Result<Claims, DecodeError> {
    let claims = decode(raw)?;
    if claims.is_expired_at(now) {
        return Err(DecodeError::Expired);
    }
    Ok(claims)
}

/// Sign a token for `subject`. Used by the mock backend and the development
/// auth server; clients never need the secret.
pub fn issue(
    subject: &str,
    email: Option<&str>,
    role: Role,
    ttl_secs: i64,
    secret: &str,
) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: now + ttl_secs,
        iat: Some(now),
        email: email.map(str::to_string),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Config(format!("Failed to create token: {}", e)))
}
