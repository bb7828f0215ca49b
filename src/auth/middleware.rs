//! Request interceptors for the protected route subset. Each interceptor
//! either calls through or answers immediately.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

use super::jwt;
use super::session::TOKEN_COOKIE;

/// First interceptor: record who is calling and for what. Never blocks.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");
    tracing::info!("called by {} for {}", host, request.uri());

    next.run(request).await
}

/// Second interceptor: require a valid session token.
///
/// Decoded claims land in the request extensions for handlers to pick up;
/// missing, malformed, and expired tokens all halt the chain with 401.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = token_from_headers(request.headers()) else {
        return ApiError::Unauthenticated.into_response();
    };

    match jwt::validate_token(&state.config.token_secret, &token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!("session token rejected: {}", err);
            ApiError::Unauthenticated.into_response()
        }
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for part in cookie_header.split(';') {
        if let Ok(cookie) = cookie::Cookie::parse(part.trim()) {
            if cookie.name() == TOKEN_COOKIE {
                return Some(cookie.value().to_string());
            }
        }
    }

    None
}
