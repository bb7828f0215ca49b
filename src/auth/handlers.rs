//! Session issuance and logout handlers.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::{jwt, session};

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
}

/// Sign the request body into a session token and set it as a cookie.
/// The claim is trusted input at sign time; no shape validation.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(user): Json<Map<String, Value>>,
) -> ApiResult<impl IntoResponse> {
    tracing::debug!("issuing session token for {:?}", user.get("email"));

    let token = jwt::create_token(&state.config.token_secret, &user)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to sign token: {}", e)))?;
    let cookie = session::issue_cookie(&token, state.config.production).to_string();

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse { success: true }),
    ))
}

/// Logout - clear the session cookie. The token is not revoked and stays
/// valid until expiry.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session::clear_cookie(state.config.production).to_string();

    (
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse { success: true }),
    )
}
