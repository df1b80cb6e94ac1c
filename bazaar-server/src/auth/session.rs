//! Session authentication for the order API
//!
//! The delivery layer receives an already-issued JWT in the `session`
//! cookie; this middleware verifies it and exposes the authenticated user
//! id to handlers. Session issuance (login) lives in the auth service, not
//! here.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// Name of the session cookie carrying the JWT
pub const SESSION_COOKIE: &str = "session";

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims for a user session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: i64,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user identity extracted from the session cookie
#[derive(Debug, Clone, Copy)]
pub struct UserIdentity {
    pub user_id: i64,
}

/// Create a session JWT for a user (used by ops tooling and tests)
pub fn create_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: user_id,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the session JWT from the cookie
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let cookie_header = request
        .headers()
        .get(http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = session_cookie_value(cookie_header)
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("session JWT validation failed: {e}");
        AppError::invalid_token("Invalid or expired session").into_response()
    })?;

    let identity = UserIdentity {
        user_id: token_data.claims.sub,
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Pick the session token out of a `Cookie` header value
fn session_cookie_value(header: &str) -> Option<&str> {
    header.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
    })
}
