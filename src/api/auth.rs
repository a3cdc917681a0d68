//! Login Handler
//!
//! Runs the credential check under the login abuse guard. A lockout answers
//! 429 with `Retry-After`; wrong credentials answer 401.

use std::fmt;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use thiserror::Error;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::guard::{retry_after_secs, AttemptError, FailureOutcome};
use crate::models::{LoginRequest, LoginResponse};

// == Credentials ==
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// The single administrator account.
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the verified username.
    pub fn verify(&self, username: &str, password: &str) -> std::result::Result<String, CredentialError> {
        if username == self.username && password == self.password {
            Ok(self.username.clone())
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// == Client Identifier ==
/// Identifies the client by network address.
///
/// Uses the socket peer address. With `trust_proxy` set, the first
/// `X-Forwarded-For` hop and then `X-Real-IP` take precedence; without it
/// those headers are client-controlled and ignored.
pub fn client_identifier(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> String {
    if trust_proxy {
        if let Some(ip) = proxy_client_ip(headers) {
            return ip;
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn proxy_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let client = client_identifier(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.trust_proxy_headers,
    );
    let credentials = state.credentials.clone();

    let outcome = state
        .guard
        .attempt(&client, || async move {
            credentials.verify(&req.username, &req.password)
        })
        .await;

    match outcome {
        Ok(username) => Ok(Json(LoginResponse::new(username))),
        Err(AttemptError::Locked { retry_after }) => Err(AppError::TooManyAttempts {
            retry_after_secs: retry_after_secs(retry_after),
        }),
        Err(AttemptError::Rejected { reason, outcome }) => {
            let message = match outcome {
                FailureOutcome::Accumulating { remaining, .. } => {
                    format!("{reason} ({remaining} attempts remaining)")
                }
                FailureOutcome::Locked { retry_after, .. } => format!(
                    "{reason}; login locked for {}s",
                    retry_after_secs(retry_after)
                ),
            };
            Err(AppError::Unauthorized(message))
        }
    }
}
