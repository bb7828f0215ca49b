//! Session token creation and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims carried by a session token: the caller's identity fields plus the
/// server-assigned expiry. Only the `email` field is ever interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Caller-supplied identity fields
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }
}

/// Token verification failure. Verification is all-or-nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    InvalidToken,
}

/// Sign the caller's identity claim into a session token valid for one hour.
pub fn create_token(
    secret: &str,
    user: &Map<String, Value>,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_with_expiry(secret, user, Utc::now() + Duration::hours(1))
}

/// Sign a claim with an explicit expiry; tests mint expired tokens through
/// this.
pub fn create_token_with_expiry(
    secret: &str,
    user: &Map<String, Value>,
    expires_at: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let mut user = user.clone();
    // Expiry is always server-assigned; a caller-supplied exp would otherwise
    // collide with the flattened map on encode.
    user.remove("exp");

    let claims = Claims {
        exp: expires_at.timestamp(),
        user,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a session token and return its claims.
pub fn validate_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    // No clock tolerance: expired means expired.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidToken,
    })
}
