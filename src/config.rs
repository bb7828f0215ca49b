use anyhow::{Context, Result};
use std::env;

/// Runtime configuration loaded from the environment.
///
/// `RUST_ENV=production` switches the session cookie to its cross-site
/// attributes (`Secure; SameSite=None`); any other value keeps the
/// development attributes (`SameSite=Strict`, no `Secure`).
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: String,
    pub db_name: String,
    pub token_secret: String,
    pub production: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "9000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            mongodb_uri: env::var("MONGODB_URI").context("MONGODB_URI must be set")?,
            db_name: env::var("MONGODB_DB").unwrap_or_else(|_| "garage".to_string()),
            token_secret: env::var("ACCESS_TOKEN_SECRET")
                .context("ACCESS_TOKEN_SECRET must be set")?,
            production: env::var("RUST_ENV").map(|v| v == "production").unwrap_or(false),
            cors_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(default_origins),
        })
    }
}

/// Client origins allowed to send credentialed requests when
/// `CORS_ALLOWED_ORIGINS` is unset or holds nothing usable.
pub fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "https://garage-client.web.app".to_string(),
        "https://garage-client.firebaseapp.com".to_string(),
    ]
}
